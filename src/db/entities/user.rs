use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::auth::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct RoleSet(pub Vec<Role>);

impl Default for RoleSet {
    fn default() -> Self {
        Self(vec![Role::User])
    }
}

#[base_entity(label = "User")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub roles: RoleSet,
    #[sea_orm(default_value = true)]
    pub active: bool,
    pub last_login_at: Option<DateTimeWithTimeZone>,
}

impl ActiveModelBehavior for ActiveModel {}
