pub mod auth;
pub mod houses;
pub mod plants;
pub mod public;
mod router;
pub mod rooms;
pub mod users;

pub use router::router;
