use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "House")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "houses")]
pub struct Model {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
