use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    crud_service::{CrudErrors, CrudService},
    ownership::OwnershipGraph,
    patch::RoomPatch,
};
use crate::{
    db::{
        dao::{
            DaoBase, RoomDao,
            link::{children_of, children_of_many},
        },
        entities::{Level, prelude::RoomPlant, room},
    },
    error::AppError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub humidity: Option<Level>,
    pub light: Option<Level>,
    #[serde(default)]
    pub air_conditioner: bool,
    #[serde(default)]
    pub radiator: bool,
    pub house_id: Option<Uuid>,
    #[serde(default)]
    pub plants: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub humidity: Level,
    pub air_conditioner: bool,
    pub radiator: bool,
    pub light: Level,
    pub plants: Vec<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl RoomView {
    pub fn new(model: room::Model, plants: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            room_type: model.room_type,
            humidity: model.humidity,
            air_conditioner: model.air_conditioner,
            radiator: model.radiator,
            light: model.light,
            plants,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct RoomService {
    dao: RoomDao,
    graph: OwnershipGraph,
}

impl CrudService for RoomService {
    type Dao = RoomDao;

    fn dao(&self) -> &RoomDao {
        &self.dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            find_failed: "Error fetching rooms",
            update_failed: "Error updating room",
        }
    }
}

impl RoomService {
    pub fn new(dao: RoomDao, graph: OwnershipGraph) -> Self {
        Self { dao, graph }
    }

    async fn plants_of(&self, id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(children_of::<RoomPlant, _>(self.dao.db(), id).await?)
    }

    pub async fn create(&self, input: NewRoom) -> Result<RoomView, AppError> {
        let name = input.name.map(|name| name.trim().to_string());
        let room_type = input.room_type.map(|kind| kind.trim().to_string());
        let (Some(name), Some(room_type), Some(house_id)) = (
            name.filter(|name| !name.is_empty()),
            room_type.filter(|kind| !kind.is_empty()),
            input.house_id,
        ) else {
            return Err(AppError::bad_request("Name, type and houseId are required"));
        };
        let (Some(humidity), Some(light)) = (input.humidity, input.light) else {
            return Err(AppError::bad_request("Humidity and light are required"));
        };

        let room = room::ActiveModel {
            name: Set(name),
            room_type: Set(room_type),
            humidity: Set(humidity),
            light: Set(light),
            air_conditioner: Set(input.air_conditioner),
            radiator: Set(input.radiator),
            ..Default::default()
        };
        let room = self.graph.create_room(house_id, room, &input.plants).await?;
        let plants = self.plants_of(room.id).await?;
        Ok(RoomView::new(room, plants))
    }

    pub async fn get_all(&self) -> Result<Vec<RoomView>, AppError> {
        let rooms = self.find_all().await?;
        let ids: Vec<Uuid> = rooms.iter().map(|room| room.id).collect();
        let mut plants = children_of_many::<RoomPlant, _>(self.dao.db(), &ids).await?;

        Ok(rooms
            .into_iter()
            .map(|room| {
                let list = plants.remove(&room.id).unwrap_or_default();
                RoomView::new(room, list)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RoomView, AppError> {
        let room = self.find_by_id(id).await?;
        let plants = self.plants_of(id).await?;
        Ok(RoomView::new(room, plants))
    }

    pub async fn update(&self, id: Uuid, patch: RoomPatch) -> Result<RoomView, AppError> {
        patch.validate()?;
        let room = CrudService::update(self, id, move |active| {
            if let Some(name) = patch.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(room_type) = patch.room_type {
                active.room_type = Set(room_type.trim().to_string());
            }
            if let Some(humidity) = patch.humidity {
                active.humidity = Set(humidity);
            }
            if let Some(light) = patch.light {
                active.light = Set(light);
            }
            if let Some(air_conditioner) = patch.air_conditioner {
                active.air_conditioner = Set(air_conditioner);
            }
            if let Some(radiator) = patch.radiator {
                active.radiator = Set(radiator);
            }
        })
        .await?;

        tracing::info!(room_id = %id, "room updated");
        let plants = self.plants_of(id).await?;
        Ok(RoomView::new(room, plants))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.graph.delete_room(id).await
    }
}
