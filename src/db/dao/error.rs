use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

// Postgres (23505) and SQLite wording, for errors that reach us without a driver code.
const UNIQUE_VIOLATION_MARKERS: [&str; 2] = [
    "duplicate key value violates unique constraint",
    "UNIQUE constraint failed",
];

impl DaoLayerError {
    /// True when the store refused a write because a unique index already holds the value.
    pub fn is_unique_violation(&self) -> bool {
        let Self::Db(err) = self else {
            return false;
        };
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return true;
        }
        let message = err.to_string();
        UNIQUE_VIOLATION_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
    }
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};
    use uuid::Uuid;

    use super::DaoLayerError;

    #[test]
    fn unique_violation_is_recognised_from_the_driver_message() {
        let err = DaoLayerError::Db(DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
        )));
        assert!(err.is_unique_violation());
    }

    #[test]
    fn other_failures_are_not_unique_violations() {
        let reset = DaoLayerError::Db(DbErr::Custom("connection reset".to_string()));
        let missing = DaoLayerError::NotFound {
            entity: "User",
            id: Uuid::new_v4(),
        };
        assert!(!reset.is_unique_violation());
        assert!(!missing.is_unique_violation());
    }
}
