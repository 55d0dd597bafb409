use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

use super::Level;

#[base_entity(label = "Room")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    pub name: String,
    pub room_type: String,
    pub humidity: Level,
    #[sea_orm(default_value = false)]
    pub air_conditioner: bool,
    #[sea_orm(default_value = false)]
    pub radiator: bool,
    pub light: Level,
}

impl ActiveModelBehavior for ActiveModel {}
