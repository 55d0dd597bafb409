use sea_orm::{Set, entity::prelude::*};

use crate::db::dao::LinkEntity;

/// A house's rooms.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "house_rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub house_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub room_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub linked_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "house_id", to = "id", on_delete = "Cascade")]
    pub house: HasOne<super::house::Entity>,
    #[sea_orm(belongs_to, from = "room_id", to = "id", on_delete = "Cascade")]
    pub room: HasOne<super::room::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl LinkEntity for Entity {
    const NAME: &'static str = "house_rooms";

    fn parent_column() -> Column {
        Column::HouseId
    }

    fn child_column() -> Column {
        Column::RoomId
    }

    fn linked_at_column() -> Column {
        Column::LinkedAt
    }

    fn new_link(parent: Uuid, child: Uuid, at: DateTimeWithTimeZone) -> ActiveModel {
        ActiveModel {
            house_id: Set(parent),
            room_id: Set(child),
            linked_at: Set(at),
            ..Default::default()
        }
    }

    fn parent_of(model: &Model) -> Uuid {
        model.house_id
    }

    fn child_of(model: &Model) -> Uuid {
        model.room_id
    }
}
