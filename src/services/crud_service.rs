use uuid::Uuid;

use crate::db::dao::{DaoBase, DaoLayerError};
use crate::error::AppError;

type CrudModel<D> = <D as DaoBase>::Model;
type CrudActiveModel<D> = <D as DaoBase>::ActiveModel;

/// Messages returned when the store fails underneath an operation.
#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub find_failed: &'static str,
    pub update_failed: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            find_failed: "Find failed",
            update_failed: "Update failed",
        }
    }
}

#[derive(Clone, Copy)]
pub enum CrudOp {
    Find,
    List,
    Update,
}

/// Reads and in-place updates shared by the entity services. Creates and deletes change
/// membership and go through the ownership graph instead.
#[async_trait::async_trait]
pub trait CrudService: Send + Sync {
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        match err {
            DaoLayerError::Db(db_err) => {
                let errors = self.errors();
                let context = match op {
                    CrudOp::Find | CrudOp::List => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                };
                AppError::internal_with_source(
                    format!("{context}. Please check the logs for more details"),
                    db_err,
                )
            }
            other => other.into(),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn find_all(&self) -> Result<Vec<CrudModel<Self::Dao>>, AppError> {
        self.dao()
            .find_all()
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<CrudModel<Self::Dao>, AppError>
    where
        F: for<'a> FnOnce(&'a mut CrudActiveModel<Self::Dao>) + Send,
    {
        self.dao()
            .update(id, apply)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use super::{CrudErrors, CrudService};
    use crate::{
        db::{
            dao::{DaoBase, HouseDao},
            entities::house,
        },
        error::AppError,
    };

    struct Houses {
        dao: HouseDao,
    }

    impl CrudService for Houses {
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

    #[tokio::test]
    async fn missing_row_maps_to_labelled_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<house::Model>::new()])
            .into_connection();
        let service = Houses {
            dao: HouseDao::new(&db),
        };

        let err = service
            .find_by_id(Uuid::new_v4())
            .await
            .expect_err("lookup should fail");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "House not found");
    }

    #[tokio::test]
    async fn store_failure_uses_operation_context() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let service = Houses {
            dao: HouseDao::new(&db),
        };

        let err = service.find_all().await.expect_err("list should fail");
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            err.message(),
            "Error fetching houses. Please check the logs for more details"
        );
    }
}
