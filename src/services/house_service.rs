use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    crud_service::{CrudErrors, CrudService},
    ownership::OwnershipGraph,
    patch::HousePatch,
};
use crate::{
    db::{
        dao::{
            DaoBase, HouseDao,
            link::{children_of, children_of_many},
        },
        entities::{house, prelude::HouseRoom},
    },
    error::AppError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHouse {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseView {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub rooms: Vec<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl HouseView {
    pub fn new(model: house::Model, rooms: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            description: model.description,
            rooms,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[derive(Clone)]
pub struct HouseService {
    dao: HouseDao,
    graph: OwnershipGraph,
}

impl CrudService for HouseService {
    type Dao = HouseDao;

    fn dao(&self) -> &HouseDao {
        &self.dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            find_failed: "Error fetching houses",
            update_failed: "Error updating house",
        }
    }
}

impl HouseService {
    pub fn new(dao: HouseDao, graph: OwnershipGraph) -> Self {
        Self { dao, graph }
    }

    async fn rooms_of(&self, id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(children_of::<HouseRoom, _>(self.dao.db(), id).await?)
    }

    pub async fn create(&self, owner: Uuid, input: NewHouse) -> Result<HouseView, AppError> {
        let (Some(name), Some(location)) = (non_blank(input.name), non_blank(input.location))
        else {
            return Err(AppError::bad_request("Name and location are required"));
        };

        let house = house::ActiveModel {
            name: Set(name),
            location: Set(location),
            description: Set(input.description),
            ..Default::default()
        };
        let house = self.graph.create_house(owner, house).await?;
        Ok(HouseView::new(house, Vec::new()))
    }

    pub async fn get_all(&self) -> Result<Vec<HouseView>, AppError> {
        let houses = self.find_all().await?;
        let ids: Vec<Uuid> = houses.iter().map(|house| house.id).collect();
        let mut rooms = children_of_many::<HouseRoom, _>(self.dao.db(), &ids).await?;

        Ok(houses
            .into_iter()
            .map(|house| {
                let list = rooms.remove(&house.id).unwrap_or_default();
                HouseView::new(house, list)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<HouseView, AppError> {
        let house = self.find_by_id(id).await?;
        let rooms = self.rooms_of(id).await?;
        Ok(HouseView::new(house, rooms))
    }

    pub async fn update(&self, id: Uuid, patch: HousePatch) -> Result<HouseView, AppError> {
        patch.validate()?;
        let house = CrudService::update(self, id, move |active| {
            if let Some(name) = patch.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(location) = patch.location {
                active.location = Set(location.trim().to_string());
            }
            if let Some(description) = patch.description {
                active.description = Set(description);
            }
        })
        .await?;

        tracing::info!(house_id = %id, "house updated");
        let rooms = self.rooms_of(id).await?;
        Ok(HouseView::new(house, rooms))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.graph.delete_house(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::json;
    use uuid::Uuid;

    use super::{HouseService, NewHouse};
    use crate::{
        db::{
            dao::{DaoBase, HouseDao},
            entities::{house, house_room},
        },
        error::AppError,
        services::{ownership::OwnershipGraph, patch::HousePatch},
        test_helpers::{fixed_ts, house_model},
    };

    fn service(db: &DatabaseConnection) -> HouseService {
        HouseService::new(HouseDao::new(db), OwnershipGraph::new(db))
    }

    fn link_row(house_id: Uuid, room_id: Uuid, secs: i64) -> house_room::Model {
        house_room::Model {
            house_id,
            room_id,
            linked_at: fixed_ts() + Duration::seconds(secs),
        }
    }

    #[tokio::test]
    async fn create_requires_name_and_location() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let input = NewHouse {
            name: Some("Cabin".to_string()),
            location: Some("  ".to_string()),
            description: None,
        };

        let err = service(&db)
            .create(Uuid::new_v4(), input)
            .await
            .expect_err("blank location must fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), "Name and location are required");
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_includes_rooms_in_link_order() {
        let house_id = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[house_model(house_id)]])
            .append_query_results([[link_row(house_id, first, 0), link_row(house_id, second, 1)]])
            .into_connection();

        let view = service(&db).get_by_id(house_id).await.expect("lookup");
        assert_eq!(view.rooms, vec![first, second]);
    }

    #[tokio::test]
    async fn get_all_batches_room_lists() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let room = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[house_model(a), house_model(b)]])
            .append_query_results([[link_row(b, room, 0)]])
            .into_connection();

        let views = service(&db).get_all().await.expect("list");
        assert_eq!(views.len(), 2);
        assert!(views[0].rooms.is_empty());
        assert_eq!(views[1].rooms, vec![room]);
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn update_missing_house_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<house::Model>::new()])
            .into_connection();
        let patch: HousePatch = serde_json::from_value(json!({ "name": "Loft" })).expect("parse");

        let err = service(&db)
            .update(Uuid::new_v4(), patch)
            .await
            .expect_err("missing house must fail");
        assert_eq!(err.message(), "House not found");
    }

    #[tokio::test]
    async fn update_clears_description_on_null() {
        let id = Uuid::new_v4();
        let mut stored = house_model(id);
        stored.description = Some("old".to_string());
        let mut updated = stored.clone();
        updated.description = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored]])
            .append_query_results([[updated]])
            .append_query_results([Vec::<house_room::Model>::new()])
            .into_connection();
        let patch: HousePatch =
            serde_json::from_value(json!({ "description": null })).expect("parse");

        let view = service(&db).update(id, patch).await.expect("update");
        assert_eq!(view.description, None);

        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("UPDATE \\\"houses\\\""), "unexpected sql: {sql}");
    }
}
