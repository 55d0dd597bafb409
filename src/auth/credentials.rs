use crate::{
    db::{
        dao::{DaoLayerError, UserDao},
        entities::user,
    },
    error::AppError,
};

use super::password::{burn_verification, hash_password, verify_password};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Email and password are required")]
    MissingFields,
    #[error("Password too short")]
    WeakPassword,
    #[error("User already exists with this email")]
    DuplicateEmail,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(#[from] DaoLayerError),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::MissingFields | CredentialError::WeakPassword => {
                AppError::bad_request(err.to_string())
            }
            CredentialError::DuplicateEmail => AppError::conflict(err.to_string()),
            // Callers must not learn which half of the pair was wrong.
            CredentialError::UserNotFound | CredentialError::InvalidCredentials => {
                AppError::bad_request("Invalid credentials")
            }
            CredentialError::Hash(reason) => AppError::internal_with_source(
                "Error hashing password. Please check the logs for more details",
                reason,
            ),
            CredentialError::Store(inner) => inner.into(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Persisted users and their hashed secrets.
#[derive(Clone)]
pub struct CredentialStore {
    users: UserDao,
}

impl CredentialStore {
    pub fn new(users: UserDao) -> Self {
        Self { users }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<user::Model, CredentialError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(CredentialError::MissingFields);
        }

        if self.users.email_taken(&email, None).await? {
            return Err(CredentialError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;
        // A concurrent registration can still win the unique index after the check above.
        let user = self
            .users
            .create_user(&email, &password_hash)
            .await
            .map_err(|err| {
                if err.is_unique_violation() {
                    CredentialError::DuplicateEmail
                } else {
                    err.into()
                }
            })?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, CredentialError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(CredentialError::MissingFields);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            burn_verification(password);
            return Err(CredentialError::UserNotFound);
        };

        if !verify_password(password, &user.password_hash)? || !user.active {
            return Err(CredentialError::InvalidCredentials);
        }
        Ok(user)
    }
}
