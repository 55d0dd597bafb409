use sea_orm::{Set, entity::prelude::*};

use crate::db::dao::LinkEntity;

/// A room's plants.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "room_plants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub room_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub plant_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub linked_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "room_id", to = "id", on_delete = "Cascade")]
    pub room: HasOne<super::room::Entity>,
    #[sea_orm(belongs_to, from = "plant_id", to = "id", on_delete = "Cascade")]
    pub plant: HasOne<super::plant::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl LinkEntity for Entity {
    const NAME: &'static str = "room_plants";

    fn parent_column() -> Column {
        Column::RoomId
    }

    fn child_column() -> Column {
        Column::PlantId
    }

    fn linked_at_column() -> Column {
        Column::LinkedAt
    }

    fn new_link(parent: Uuid, child: Uuid, at: DateTimeWithTimeZone) -> ActiveModel {
        ActiveModel {
            room_id: Set(parent),
            plant_id: Set(child),
            linked_at: Set(at),
            ..Default::default()
        }
    }

    fn parent_of(model: &Model) -> Uuid {
        model.room_id
    }

    fn child_of(model: &Model) -> Uuid {
        model.plant_id
    }
}
