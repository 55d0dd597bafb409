use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

use super::CareLevel;

// room_id is the plant's own record of where it lives; membership is room_plants.
#[base_entity(label = "Plant")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "plants")]
pub struct Model {
    pub name: String,
    pub scientific_name: Option<String>,
    pub species: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub water_frequency: i32,
    pub sunlight: CareLevel,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub humidity: Option<CareLevel>,
    pub fertilizing_frequency: Option<i32>,
    pub last_watered: Option<DateTimeWithTimeZone>,
    pub last_fertilized: Option<DateTimeWithTimeZone>,
    pub last_repotted: Option<DateTimeWithTimeZone>,
    pub date_acquired: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
    #[sea_orm(indexed)]
    pub room_id: Uuid,
    #[sea_orm(default_value = true)]
    pub is_alive: bool,
}

impl ActiveModelBehavior for ActiveModel {}
