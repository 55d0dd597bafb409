pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod house_dao;
pub mod link;
pub mod plant_dao;
pub mod room_dao;
pub mod user_dao;

pub use base::{
    DaoBase, DaoPager, PaginatedResponse, delete_in, find_in, insert_stamped, now, update_in,
};
pub use base_traits::{
    EntityLabel, HasCreatedAtColumn, HasIdActiveModel, HasIdColumn, TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use house_dao::HouseDao;
pub use link::LinkEntity;
pub use plant_dao::PlantDao;
pub use room_dao::RoomDao;
pub use user_dao::UserDao;
