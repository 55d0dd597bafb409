use std::collections::HashSet;

use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    db::{
        dao::{
            DaoLayerError, DaoResult, delete_in, find_in, insert_stamped,
            link::{link, unlink_child, unlink_parent},
            plant_dao::{missing_plants, reassign_room},
            update_in,
        },
        entities::{
            house, plant,
            prelude::{House, HouseRoom, Plant, Room, RoomPlant, User, UserHouse},
            room,
        },
    },
    error::AppError,
};

/// Keeps the user→house, house→room and room→plant lists in step with the rows they point
/// at. Every operation is one transaction; an error drops it and nothing is applied.
///
/// Deleting a parent only removes membership rows. Child records are kept.
#[derive(Clone)]
pub struct OwnershipGraph {
    db: DatabaseConnection,
}

impl OwnershipGraph {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    async fn begin(&self) -> DaoResult<DatabaseTransaction> {
        self.db.begin().await.map_err(DaoLayerError::Db)
    }

    async fn commit(txn: DatabaseTransaction) -> DaoResult<()> {
        txn.commit().await.map_err(DaoLayerError::Db)
    }

    pub async fn create_house(
        &self,
        owner: Uuid,
        house: house::ActiveModel,
    ) -> Result<house::Model, AppError> {
        let txn = self.begin().await?;
        find_in::<User, _>(&txn, owner).await?;
        let house = insert_stamped::<House, _, _>(&txn, house).await?;
        link::<UserHouse, _>(&txn, owner, house.id).await?;
        Self::commit(txn).await?;

        tracing::info!(user_id = %owner, house_id = %house.id, "house created");
        Ok(house)
    }

    pub async fn delete_house(&self, id: Uuid) -> Result<(), AppError> {
        let txn = self.begin().await?;
        let owners = unlink_child::<UserHouse, _>(&txn, id).await?;
        let rooms = unlink_parent::<HouseRoom, _>(&txn, id).await?;
        delete_in::<House, _>(&txn, id).await?;
        Self::commit(txn).await?;

        tracing::info!(house_id = %id, owners, rooms, "house deleted");
        Ok(())
    }

    /// Creates a room inside `house_id`. Listed plants are moved into it.
    pub async fn create_room(
        &self,
        house_id: Uuid,
        room: room::ActiveModel,
        plants: &[Uuid],
    ) -> Result<room::Model, AppError> {
        let mut seen = HashSet::new();
        let plants: Vec<Uuid> = plants.iter().copied().filter(|id| seen.insert(*id)).collect();

        let txn = self.begin().await?;
        find_in::<House, _>(&txn, house_id).await?;
        if let Some(unknown) = missing_plants(&txn, &plants).await?.first() {
            return Err(AppError::bad_request(format!("Unknown plant id: {unknown}")));
        }

        let room = insert_stamped::<Room, _, _>(&txn, room).await?;
        link::<HouseRoom, _>(&txn, house_id, room.id).await?;
        for plant_id in &plants {
            unlink_child::<RoomPlant, _>(&txn, *plant_id).await?;
            link::<RoomPlant, _>(&txn, room.id, *plant_id).await?;
        }
        reassign_room(&txn, &plants, room.id).await?;
        Self::commit(txn).await?;

        tracing::info!(house_id = %house_id, room_id = %room.id, plants = plants.len(), "room created");
        Ok(room)
    }

    pub async fn delete_room(&self, id: Uuid) -> Result<(), AppError> {
        let txn = self.begin().await?;
        let houses = unlink_child::<HouseRoom, _>(&txn, id).await?;
        let plants = unlink_parent::<RoomPlant, _>(&txn, id).await?;
        delete_in::<Room, _>(&txn, id).await?;
        Self::commit(txn).await?;

        tracing::info!(room_id = %id, houses, plants, "room deleted");
        Ok(())
    }

    pub async fn create_plant(
        &self,
        room_id: Uuid,
        mut plant: plant::ActiveModel,
    ) -> Result<plant::Model, AppError> {
        let txn = self.begin().await?;
        find_in::<Room, _>(&txn, room_id).await?;
        plant.room_id = Set(room_id);
        let plant = insert_stamped::<Plant, _, _>(&txn, plant).await?;
        link::<RoomPlant, _>(&txn, room_id, plant.id).await?;
        Self::commit(txn).await?;

        tracing::info!(room_id = %room_id, plant_id = %plant.id, "plant created");
        Ok(plant)
    }

    /// Applies `apply` to the plant and moves it into `room_id`, out of every other room.
    pub async fn move_plant<F>(
        &self,
        plant_id: Uuid,
        room_id: Uuid,
        apply: F,
    ) -> Result<plant::Model, AppError>
    where
        F: FnOnce(&mut plant::ActiveModel) + Send,
    {
        let txn = self.begin().await?;
        find_in::<Room, _>(&txn, room_id).await?;
        let plant = update_in::<Plant, _, _>(&txn, plant_id, move |active| {
            apply(active);
            active.room_id = Set(room_id);
        })
        .await?;
        unlink_child::<RoomPlant, _>(&txn, plant_id).await?;
        link::<RoomPlant, _>(&txn, room_id, plant_id).await?;
        Self::commit(txn).await?;

        tracing::info!(plant_id = %plant_id, room_id = %room_id, "plant moved");
        Ok(plant)
    }

    pub async fn delete_plant(&self, id: Uuid) -> Result<(), AppError> {
        let txn = self.begin().await?;
        let rooms = unlink_child::<RoomPlant, _>(&txn, id).await?;
        delete_in::<Plant, _>(&txn, id).await?;
        Self::commit(txn).await?;

        tracing::info!(plant_id = %id, rooms, "plant deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Set};
    use uuid::Uuid;

    use super::OwnershipGraph;
    use crate::{
        db::entities::{CareLevel, Level, house, plant, room, user},
        error::AppError,
        test_helpers::{house_model, plant_model, room_model, user_model},
    };

    fn rows(n: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: n,
        }
    }

    fn log_of(db: DatabaseConnection) -> String {
        format!("{:?}", db.into_transaction_log())
    }

    fn new_house() -> house::ActiveModel {
        house::ActiveModel {
            name: Set("Cabin".to_string()),
            location: Set("Lakeside".to_string()),
            description: Set(None),
            ..Default::default()
        }
    }

    fn new_room() -> room::ActiveModel {
        room::ActiveModel {
            name: Set("Kitchen".to_string()),
            room_type: Set("kitchen".to_string()),
            humidity: Set(Level::Medium),
            light: Set(Level::High),
            air_conditioner: Set(false),
            radiator: Set(true),
            ..Default::default()
        }
    }

    fn new_plant() -> plant::ActiveModel {
        plant::ActiveModel {
            name: Set("Fern".to_string()),
            water_frequency: Set(3),
            sunlight: Set(CareLevel::Low),
            is_alive: Set(true),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_house_links_it_to_the_owner_in_one_transaction() {
        let owner = Uuid::new_v4();
        let house_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(owner, "fern@example.com")]])
            .append_query_results([[house_model(house_id)]])
            .append_exec_results([rows(1)])
            .into_connection();

        let house = OwnershipGraph::new(&db)
            .create_house(owner, new_house())
            .await
            .expect("create should succeed");
        assert_eq!(house.id, house_id);

        let sql = log_of(db);
        assert!(sql.contains("INSERT INTO \\\"houses\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("INSERT INTO \\\"user_houses\\\""), "unexpected sql: {sql}");
        assert!(sql.contains(&owner.to_string()), "owner not linked: {sql}");
        assert!(sql.contains("COMMIT"), "expected commit: {sql}");
    }

    #[tokio::test]
    async fn create_house_for_unknown_owner_writes_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = OwnershipGraph::new(&db)
            .create_house(Uuid::new_v4(), new_house())
            .await
            .expect_err("unknown owner must fail");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "User not found");

        let sql = log_of(db);
        assert!(!sql.contains("INSERT"), "nothing should be written: {sql}");
        assert!(!sql.contains("COMMIT"), "must not commit: {sql}");
    }

    #[tokio::test]
    async fn delete_house_pulls_it_from_every_list_and_keeps_rooms() {
        let house_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([rows(2), rows(3), rows(1)])
            .into_connection();

        OwnershipGraph::new(&db)
            .delete_house(house_id)
            .await
            .expect("delete should succeed");

        let sql = log_of(db);
        assert!(sql.contains("DELETE FROM \\\"user_houses\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("DELETE FROM \\\"house_rooms\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("DELETE FROM \\\"houses\\\""), "unexpected sql: {sql}");
        assert!(!sql.contains("DELETE FROM \\\"rooms\\\""), "rooms must be retained: {sql}");
        assert!(sql.contains("COMMIT"), "expected commit: {sql}");
    }

    #[tokio::test]
    async fn delete_missing_house_is_not_found_and_rolls_back() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([rows(0), rows(0), rows(0)])
            .into_connection();

        let err = OwnershipGraph::new(&db)
            .delete_house(Uuid::new_v4())
            .await
            .expect_err("missing house must fail");
        assert_eq!(err.message(), "House not found");
        assert!(!log_of(db).contains("COMMIT"));
    }

    #[tokio::test]
    async fn create_room_links_into_house_and_moves_plants() {
        let house_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();
        let plant_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[house_model(house_id)]])
            .append_query_results([[plant_model(plant_id, Uuid::new_v4())]])
            .append_query_results([[room_model(room_id)]])
            .append_exec_results([rows(1), rows(1), rows(1), rows(1)])
            .into_connection();

        let room = OwnershipGraph::new(&db)
            .create_room(house_id, new_room(), &[plant_id, plant_id])
            .await
            .expect("create should succeed");
        assert_eq!(room.id, room_id);

        let sql = log_of(db);
        assert!(sql.contains("INSERT INTO \\\"house_rooms\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("INSERT INTO \\\"room_plants\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("UPDATE \\\"plants\\\""), "plant room not updated: {sql}");
        assert_eq!(sql.matches("INSERT INTO \\\"room_plants\\\"").count(), 1);
    }

    #[tokio::test]
    async fn create_room_rejects_unknown_plants() {
        let house_id = Uuid::new_v4();
        let ghost = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[house_model(house_id)]])
            .append_query_results([Vec::<plant::Model>::new()])
            .into_connection();

        let err = OwnershipGraph::new(&db)
            .create_room(house_id, new_room(), &[ghost])
            .await
            .expect_err("unknown plant must fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), format!("Unknown plant id: {ghost}"));
        assert!(!log_of(db).contains("INSERT"));
    }

    #[tokio::test]
    async fn create_room_in_missing_house_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<house::Model>::new()])
            .into_connection();

        let err = OwnershipGraph::new(&db)
            .create_room(Uuid::new_v4(), new_room(), &[])
            .await
            .expect_err("missing house must fail");
        assert_eq!(err.message(), "House not found");
    }

    #[tokio::test]
    async fn delete_room_unlinks_and_leaves_house_and_plants() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([rows(1), rows(2), rows(1)])
            .into_connection();

        OwnershipGraph::new(&db)
            .delete_room(Uuid::new_v4())
            .await
            .expect("delete should succeed");

        let sql = log_of(db);
        assert!(sql.contains("DELETE FROM \\\"house_rooms\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("DELETE FROM \\\"room_plants\\\""), "unexpected sql: {sql}");
        assert!(!sql.contains("DELETE FROM \\\"houses\\\""), "house must stay: {sql}");
        assert!(!sql.contains("DELETE FROM \\\"plants\\\""), "plants must stay: {sql}");
    }

    #[tokio::test]
    async fn create_plant_requires_room_and_links_it() {
        let room_id = Uuid::new_v4();
        let plant_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[room_model(room_id)]])
            .append_query_results([[plant_model(plant_id, room_id)]])
            .append_exec_results([rows(1)])
            .into_connection();

        let plant = OwnershipGraph::new(&db)
            .create_plant(room_id, new_plant())
            .await
            .expect("create should succeed");
        assert_eq!(plant.room_id, room_id);

        let sql = log_of(db);
        assert!(sql.contains("INSERT INTO \\\"room_plants\\\""), "unexpected sql: {sql}");
    }

    #[tokio::test]
    async fn create_plant_in_missing_room_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<room::Model>::new()])
            .into_connection();

        let err = OwnershipGraph::new(&db)
            .create_plant(Uuid::new_v4(), new_plant())
            .await
            .expect_err("missing room must fail");
        assert_eq!(err.message(), "Room not found");
    }

    #[tokio::test]
    async fn move_plant_relinks_in_one_transaction() {
        let old_room = Uuid::new_v4();
        let new_room_id = Uuid::new_v4();
        let plant_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[room_model(new_room_id)]])
            .append_query_results([[plant_model(plant_id, old_room)]])
            .append_query_results([[plant_model(plant_id, new_room_id)]])
            .append_exec_results([rows(1), rows(1)])
            .into_connection();

        let plant = OwnershipGraph::new(&db)
            .move_plant(plant_id, new_room_id, |active| {
                active.name = Set("Boston fern".to_string());
            })
            .await
            .expect("move should succeed");
        assert_eq!(plant.room_id, new_room_id);

        let sql = log_of(db);
        assert!(sql.contains("DELETE FROM \\\"room_plants\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("INSERT INTO \\\"room_plants\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("Boston fern"), "patch not applied: {sql}");
        assert!(sql.contains("COMMIT"), "expected commit: {sql}");
    }

    #[tokio::test]
    async fn delete_plant_pulls_it_from_rooms() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([rows(1), rows(1)])
            .into_connection();

        OwnershipGraph::new(&db)
            .delete_plant(Uuid::new_v4())
            .await
            .expect("delete should succeed");

        let sql = log_of(db);
        assert!(sql.contains("DELETE FROM \\\"room_plants\\\""), "unexpected sql: {sql}");
        assert!(sql.contains("DELETE FROM \\\"plants\\\""), "unexpected sql: {sql}");
    }
}
