use sea_orm::{Set, entity::prelude::*};

use crate::db::dao::LinkEntity;

/// A user's houses.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_houses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub house_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub linked_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
    #[sea_orm(belongs_to, from = "house_id", to = "id", on_delete = "Cascade")]
    pub house: HasOne<super::house::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl LinkEntity for Entity {
    const NAME: &'static str = "user_houses";

    fn parent_column() -> Column {
        Column::UserId
    }

    fn child_column() -> Column {
        Column::HouseId
    }

    fn linked_at_column() -> Column {
        Column::LinkedAt
    }

    fn new_link(parent: Uuid, child: Uuid, at: DateTimeWithTimeZone) -> ActiveModel {
        ActiveModel {
            user_id: Set(parent),
            house_id: Set(child),
            linked_at: Set(at),
            ..Default::default()
        }
    }

    fn parent_of(model: &Model) -> Uuid {
        model.user_id
    }

    fn child_of(model: &Model) -> Uuid {
        model.house_id
    }
}
