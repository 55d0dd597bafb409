use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Expr, ExprLit, Fields, ItemStruct, Lit, LitStr, Meta, Token, parse_macro_input,
    punctuated::Punctuated,
};

/// Adds the `id`, `created_at` and `updated_at` columns every stored record carries and wires
/// the model into the generic DAO (`crate::db::dao::base_traits`).
///
/// `label` names the record in not-found errors.
///
/// ```ignore
/// #[base_entity(label = "House")]
/// #[sea_orm::model]
/// #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
/// #[sea_orm(table_name = "houses")]
/// pub struct Model {
///     pub name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let label = match parse_label(args) {
        Ok(label) => label,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut input = parse_macro_input!(item as ItemStruct);
    let Fields::Named(fields) = &mut input.fields else {
        return syn::Error::new(Span::call_site(), "base_entity needs a struct with named fields")
            .to_compile_error()
            .into();
    };

    let reserved = ["id", "created_at", "updated_at"];
    if let Some(clash) = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| reserved.iter().any(|name| *ident == name))
    {
        return syn::Error::new_spanned(clash, format!("`{clash}` is added by base_entity"))
            .to_compile_error()
            .into();
    }

    let stamped: syn::FieldsNamed = syn::parse_quote!({
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: uuid::Uuid,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: sea_orm::entity::prelude::DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone,
    });
    let own = std::mem::take(&mut fields.named);
    fields.named = stamped.named.into_iter().chain(own).collect();

    quote! {
        #input

        impl crate::db::dao::base_traits::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl crate::db::dao::base_traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl crate::db::dao::base_traits::HasCreatedAtColumn for Entity {
            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }

        impl crate::db::dao::base_traits::HasIdColumn for Entity {
            fn id_column() -> Column {
                Column::Id
            }
        }

        impl crate::db::dao::base_traits::EntityLabel for Entity {
            const LABEL: &'static str = #label;
        }
    }
    .into()
}

fn parse_label(args: Punctuated<Meta, Token![,]>) -> syn::Result<LitStr> {
    let mut label = None;
    for meta in args {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(meta, "expected `label = \"...\"`"));
        };
        if !pair.path.is_ident("label") {
            return Err(syn::Error::new_spanned(pair.path, "unknown base_entity key"));
        }
        let value = match pair.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(value),
                ..
            }) => value,
            other => {
                return Err(syn::Error::new_spanned(other, "label must be a string literal"));
            }
        };
        if value.value().trim().is_empty() {
            return Err(syn::Error::new(value.span(), "label must not be empty"));
        }
        label = Some(value);
    }

    label.ok_or_else(|| {
        syn::Error::new(Span::call_site(), "base_entity needs `label = \"...\"`")
    })
}
