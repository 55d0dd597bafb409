use sea_orm::DatabaseConnection;

use super::{DaoBase, HouseDao, PlantDao, RoomDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn house(&self) -> HouseDao {
        DaoBase::new(&self.db)
    }

    pub fn room(&self) -> RoomDao {
        DaoBase::new(&self.db)
    }

    pub fn plant(&self) -> PlantDao {
        DaoBase::new(&self.db)
    }
}
