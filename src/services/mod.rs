pub mod auth_service;
pub mod context;
pub mod crud_service;
pub mod house_service;
pub mod ownership;
pub mod patch;
pub mod plant_service;
pub mod room_service;
pub mod user_service;

pub use context::ServiceContext;
