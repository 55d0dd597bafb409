use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::house as entity;
use crate::db::entities::prelude::House;

#[derive(Clone)]
pub struct HouseDao {
    db: DatabaseConnection,
}

impl DaoBase for HouseDao {
    type Entity = House;
    type Model = entity::Model;
    type ActiveModel = entity::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
