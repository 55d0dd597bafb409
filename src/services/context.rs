use sea_orm::DatabaseConnection;

use crate::{
    auth::{CredentialStore, TokenService},
    db::dao::DaoContext,
    services::{
        auth_service::AuthService, house_service::HouseService, ownership::OwnershipGraph,
        plant_service::PlantService, room_service::RoomService, user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    fn graph(&self) -> OwnershipGraph {
        OwnershipGraph::new(self.daos.db())
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn house(&self) -> HouseService {
        HouseService::new(self.daos.house(), self.graph())
    }

    pub fn room(&self) -> RoomService {
        RoomService::new(self.daos.room(), self.graph())
    }

    pub fn plant(&self) -> PlantService {
        PlantService::new(self.daos.plant(), self.graph())
    }

    pub fn auth<'a>(&self, tokens: &'a TokenService) -> AuthService<'a> {
        AuthService::new(CredentialStore::new(self.daos.user()), self.user(), tokens)
    }
}
