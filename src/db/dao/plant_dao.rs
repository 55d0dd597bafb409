use std::collections::HashSet;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, now};
use crate::db::entities::plant as entity;
use crate::db::entities::prelude::Plant;

#[derive(Clone)]
pub struct PlantDao {
    db: DatabaseConnection,
}

impl DaoBase for PlantDao {
    type Entity = Plant;
    type Model = entity::Model;
    type ActiveModel = entity::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Ids from `ids` with no plant row, in the order given.
pub async fn missing_plants<C>(conn: &C, ids: &[Uuid]) -> DaoResult<Vec<Uuid>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: HashSet<Uuid> = Plant::find()
        .filter(entity::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await
        .map_err(DaoLayerError::Db)?
        .into_iter()
        .map(|plant| plant.id)
        .collect();
    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
}

/// Points every plant in `ids` at `room_id` in one statement.
pub async fn reassign_room<C>(conn: &C, ids: &[Uuid], room_id: Uuid) -> DaoResult<u64>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let result = Plant::update_many()
        .col_expr(entity::Column::RoomId, Expr::value(room_id))
        .col_expr(entity::Column::UpdatedAt, Expr::value(now()))
        .filter(entity::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{missing_plants, reassign_room};
    use crate::db::dao::now;
    use crate::db::entities::plant;
    use crate::test_helpers::{plant_model, timestamps_written_by};

    #[tokio::test]
    async fn missing_plants_reports_unknown_ids_in_order() {
        let known = Uuid::new_v4();
        let ghost_a = Uuid::new_v4();
        let ghost_b = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[plant_model(known, Uuid::new_v4())]])
            .into_connection();

        let missing = missing_plants(&db, &[ghost_a, known, ghost_b])
            .await
            .expect("query should succeed");

        assert_eq!(missing, vec![ghost_a, ghost_b]);
    }

    #[tokio::test]
    async fn no_ids_means_no_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<plant::Model>::new()])
            .into_connection();

        let missing = missing_plants(&db, &[]).await.expect("nothing to check");

        assert!(missing.is_empty());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn reassign_room_restamps_moved_plants() {
        let before = now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let moved = reassign_room(&db, &[Uuid::new_v4(), Uuid::new_v4()], Uuid::new_v4())
            .await
            .expect("update should succeed");
        assert_eq!(moved, 2);

        let (sql, stamps) = timestamps_written_by(&db.into_transaction_log(), "UPDATE");
        assert!(sql.contains("\"updated_at\" = "), "unexpected sql: {sql}");
        assert!(!sql.contains("\"created_at\" = "), "unexpected sql: {sql}");
        assert_eq!(stamps.len(), 1);
        assert!(stamps[0] >= before);
    }
}
