use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use super::user_service::UserService;
use crate::{
    auth::{CredentialStore, TokenService},
    db::dao::now,
    error::AppError,
};

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub last_login: Option<DateTime<FixedOffset>>,
    pub token: String,
}

pub struct AuthService<'a> {
    credentials: CredentialStore,
    users: UserService,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(credentials: CredentialStore, users: UserService, tokens: &'a TokenService) -> Self {
        Self {
            credentials,
            users,
            tokens,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<RegisteredUser, AppError> {
        let user = self.credentials.register(email, password).await?;
        Ok(RegisteredUser {
            id: user.id,
            email: user.email,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let user = match self.credentials.verify_credentials(email, password).await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(reason = %err, "login rejected");
                return Err(err.into());
            }
        };

        let issued = self.tokens.issue(user.id)?;
        let user = self.users.record_login(user.id, now()).await?;
        tracing::info!(user_id = %user.id, expires_at = issued.expires_at, "user signed in");

        Ok(LoginResult {
            id: user.id,
            email: user.email,
            username: user.username,
            last_login: user.last_login_at,
            token: issued.token,
        })
    }
}
