#[allow(unused_imports)]
pub mod prelude {
    pub use super::house::Entity as House;
    pub use super::house_room::Entity as HouseRoom;
    pub use super::plant::Entity as Plant;
    pub use super::room::Entity as Room;
    pub use super::room_plant::Entity as RoomPlant;
    pub use super::user::Entity as User;
    pub use super::user_house::Entity as UserHouse;
}

pub mod house;
pub mod house_room;
pub mod levels;
pub mod plant;
pub mod room;
pub mod room_plant;
pub mod user;
pub mod user_house;

pub use levels::{CareLevel, Level};
