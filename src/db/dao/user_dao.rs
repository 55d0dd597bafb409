use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::user::{self as entity, RoleSet};
use crate::db::entities::prelude::User;

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;
    type Model = entity::Model;
    type ActiveModel = entity::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    /// `email` must already be normalised; lookups are exact.
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<entity::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(entity::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// True when an account other than `except` already uses `email`.
    pub async fn email_taken(&self, email: &str, except: Option<Uuid>) -> DaoResult<bool> {
        let holder = self.find_by_email(email).await?;
        Ok(holder.is_some_and(|user| Some(user.id) != except))
    }

    pub async fn create_user(&self, email: &str, password_hash: &str) -> DaoResult<entity::Model> {
        let model = entity::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            roles: Set(RoleSet::default()),
            active: Set(true),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(
        &self,
        id: Uuid,
        at: chrono::DateTime<chrono::FixedOffset>,
    ) -> DaoResult<entity::Model> {
        self.update(id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::UserDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::user::{self, RoleSet};
    use crate::test_helpers::{fixed_ts, user_model};

    #[tokio::test]
    async fn find_by_email_returns_first_match() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "fern@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("fern@example.com")
            .await
            .expect("query should succeed");
        assert_eq!(result.map(|u| u.id), Some(id));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("missing@example.com")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn create_user_defaults_roles_and_activity() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "fern@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let created = dao
            .create_user("fern@example.com", "hash")
            .await
            .expect("insert should succeed");

        assert_eq!(created.roles, RoleSet::default());
        assert!(created.active);
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("INSERT INTO \\\"users\\\""), "unexpected sql: {sql}");
    }

    #[tokio::test]
    async fn email_taken_ignores_the_caller_own_account() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [user_model(id, "fern@example.com")],
                [user_model(id, "fern@example.com")],
            ])
            .into_connection();
        let dao = UserDao::new(&db);

        assert!(!dao.email_taken("fern@example.com", Some(id)).await.expect("query"));
        assert!(dao.email_taken("fern@example.com", None).await.expect("query"));
    }

    #[tokio::test]
    async fn set_last_login_propagates_not_found() {
        let missing_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .set_last_login(missing_id, fixed_ts())
            .await
            .expect_err("update should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { entity: "User", id } if id == missing_id
        ));
    }
}
