use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    crud_service::{CrudErrors, CrudService},
    ownership::OwnershipGraph,
    patch::{PlantPatch, TemperatureRange},
};
use crate::{
    db::{
        dao::PlantDao,
        entities::{CareLevel, plant},
    },
    error::AppError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub species: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub water_frequency: Option<i32>,
    pub sunlight: Option<CareLevel>,
    pub temperature_range: Option<TemperatureRange>,
    pub humidity: Option<CareLevel>,
    pub fertilizing_frequency: Option<i32>,
    pub last_watered: Option<DateTime<FixedOffset>>,
    pub last_fertilized: Option<DateTime<FixedOffset>>,
    pub last_repotted: Option<DateTime<FixedOffset>>,
    pub date_acquired: Option<DateTime<FixedOffset>>,
    pub notes: Option<String>,
    pub room: Option<Uuid>,
    pub is_alive: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantView {
    pub id: Uuid,
    pub name: String,
    pub scientific_name: Option<String>,
    pub species: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub water_frequency: i32,
    pub sunlight: CareLevel,
    pub temperature_range: Option<TemperatureRange>,
    pub humidity: Option<CareLevel>,
    pub fertilizing_frequency: Option<i32>,
    pub last_watered: Option<DateTime<FixedOffset>>,
    pub last_fertilized: Option<DateTime<FixedOffset>>,
    pub last_repotted: Option<DateTime<FixedOffset>>,
    pub date_acquired: Option<DateTime<FixedOffset>>,
    pub notes: Option<String>,
    pub room: Uuid,
    pub is_alive: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<plant::Model> for PlantView {
    fn from(model: plant::Model) -> Self {
        let range = TemperatureRange {
            min: model.temperature_min,
            max: model.temperature_max,
        };
        Self {
            id: model.id,
            name: model.name,
            scientific_name: model.scientific_name,
            species: model.species,
            description: model.description,
            image_url: model.image_url,
            water_frequency: model.water_frequency,
            sunlight: model.sunlight,
            temperature_range: (!range.is_empty()).then_some(range),
            humidity: model.humidity,
            fertilizing_frequency: model.fertilizing_frequency,
            last_watered: model.last_watered,
            last_fertilized: model.last_fertilized,
            last_repotted: model.last_repotted,
            date_acquired: model.date_acquired,
            notes: model.notes,
            room: model.room_id,
            is_alive: model.is_alive,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn set_range(active: &mut plant::ActiveModel, range: Option<TemperatureRange>) {
    let range = range.unwrap_or_default();
    active.temperature_min = Set(range.min);
    active.temperature_max = Set(range.max);
}

fn apply_patch(patch: PlantPatch, active: &mut plant::ActiveModel) {
    if let Some(name) = patch.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(value) = patch.scientific_name {
        active.scientific_name = Set(value);
    }
    if let Some(value) = patch.species {
        active.species = Set(value);
    }
    if let Some(value) = patch.description {
        active.description = Set(value);
    }
    if let Some(value) = patch.image_url {
        active.image_url = Set(value);
    }
    if let Some(days) = patch.water_frequency {
        active.water_frequency = Set(days);
    }
    if let Some(level) = patch.sunlight {
        active.sunlight = Set(level);
    }
    if let Some(range) = patch.temperature_range {
        set_range(active, range);
    }
    if let Some(level) = patch.humidity {
        active.humidity = Set(level);
    }
    if let Some(days) = patch.fertilizing_frequency {
        active.fertilizing_frequency = Set(days);
    }
    if let Some(at) = patch.last_watered {
        active.last_watered = Set(at);
    }
    if let Some(at) = patch.last_fertilized {
        active.last_fertilized = Set(at);
    }
    if let Some(at) = patch.last_repotted {
        active.last_repotted = Set(at);
    }
    if let Some(at) = patch.date_acquired {
        active.date_acquired = Set(at);
    }
    if let Some(notes) = patch.notes {
        active.notes = Set(notes);
    }
    if let Some(alive) = patch.is_alive {
        active.is_alive = Set(alive);
    }
}

#[derive(Clone)]
pub struct PlantService {
    dao: PlantDao,
    graph: OwnershipGraph,
}

impl CrudService for PlantService {
    type Dao = PlantDao;

    fn dao(&self) -> &PlantDao {
        &self.dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            find_failed: "Error fetching plants",
            update_failed: "Error updating plant",
        }
    }
}

impl PlantService {
    pub fn new(dao: PlantDao, graph: OwnershipGraph) -> Self {
        Self { dao, graph }
    }

    pub async fn create(&self, input: NewPlant) -> Result<PlantView, AppError> {
        let name = input
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let (Some(name), Some(water_frequency), Some(sunlight), Some(room_id)) =
            (name, input.water_frequency, input.sunlight, input.room)
        else {
            return Err(AppError::bad_request(
                "Name, waterFrequency, sunlight and room are required",
            ));
        };

        let checks = PlantPatch {
            water_frequency: Some(water_frequency),
            fertilizing_frequency: Some(input.fertilizing_frequency),
            temperature_range: Some(input.temperature_range),
            ..Default::default()
        };
        checks.validate()?;

        let mut plant = plant::ActiveModel {
            name: Set(name),
            scientific_name: Set(input.scientific_name),
            species: Set(input.species),
            description: Set(input.description),
            image_url: Set(input.image_url),
            water_frequency: Set(water_frequency),
            sunlight: Set(sunlight),
            humidity: Set(input.humidity),
            fertilizing_frequency: Set(input.fertilizing_frequency),
            last_watered: Set(input.last_watered),
            last_fertilized: Set(input.last_fertilized),
            last_repotted: Set(input.last_repotted),
            date_acquired: Set(input.date_acquired),
            notes: Set(input.notes),
            is_alive: Set(input.is_alive.unwrap_or(true)),
            ..Default::default()
        };
        set_range(&mut plant, input.temperature_range);

        let plant = self.graph.create_plant(room_id, plant).await?;
        Ok(plant.into())
    }

    pub async fn get_all(&self) -> Result<Vec<PlantView>, AppError> {
        let plants = self.find_all().await?;
        Ok(plants.into_iter().map(PlantView::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PlantView, AppError> {
        Ok(self.find_by_id(id).await?.into())
    }

    /// A patch carrying `room` moves the plant; the move and the field changes commit together.
    pub async fn update(&self, id: Uuid, mut patch: PlantPatch) -> Result<PlantView, AppError> {
        patch.validate()?;
        let plant = match patch.room.take() {
            Some(room_id) => {
                self.graph
                    .move_plant(id, room_id, move |active| apply_patch(patch, active))
                    .await?
            }
            None => CrudService::update(self, id, move |active| apply_patch(patch, active)).await?,
        };

        tracing::info!(plant_id = %id, "plant updated");
        Ok(plant.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.graph.delete_plant(id).await
    }
}
