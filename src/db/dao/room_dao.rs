use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::prelude::Room;
use crate::db::entities::room as entity;

#[derive(Clone)]
pub struct RoomDao {
    db: DatabaseConnection,
}

impl DaoBase for RoomDao {
    type Entity = Room;
    type Model = entity::Model;
    type ActiveModel = entity::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
