use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use super::{
    crud_service::{CrudErrors, CrudOp, CrudService},
    patch::UserPatch,
};
use crate::{
    auth::{CredentialError, Role, credentials::normalize_email, password::hash_password},
    db::{
        dao::{DaoBase, UserDao, link::children_of},
        entities::{prelude::UserHouse, user},
    },
    error::AppError,
};

/// A user as callers see it. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub roles: Vec<Role>,
    pub active: bool,
    pub last_login: Option<DateTime<FixedOffset>>,
    pub houses: Vec<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl UserView {
    pub fn new(model: user::Model, houses: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            bio: model.bio,
            phone_number: model.phone_number,
            profile_picture: model.profile_picture,
            roles: model.roles.0,
            active: model.active,
            last_login: model.last_login_at,
            houses,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// Profile text is stored trimmed and lowercased; blank clears the field.
fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty())
}

#[derive(Clone)]
pub struct UserService {
    dao: UserDao,
}

impl CrudService for UserService {
    type Dao = UserDao;

    fn dao(&self) -> &UserDao {
        &self.dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            find_failed: "Error fetching user",
            update_failed: "Error updating user",
        }
    }
}

impl UserService {
    pub fn new(dao: UserDao) -> Self {
        Self { dao }
    }

    async fn houses_of(&self, id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(children_of::<UserHouse, _>(self.dao.db(), id).await?)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserView, AppError> {
        let user = self.find_by_id(user_id).await?;
        let houses = self.houses_of(user_id).await?;
        Ok(UserView::new(user, houses))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: UserPatch,
    ) -> Result<UserView, AppError> {
        patch.validate()?;

        let email = patch.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if self.dao.email_taken(email, Some(user_id)).await? {
                return Err(CredentialError::DuplicateEmail.into());
            }
        }
        let password_hash = match patch.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = self
            .dao
            .update(user_id, move |active| {
                if let Some(email) = email {
                    active.email = Set(email);
                }
                if let Some(hash) = password_hash {
                    active.password_hash = Set(hash);
                }
                if let Some(username) = patch.username {
                    active.username = Set(normalize_text(username));
                }
                if let Some(first_name) = patch.first_name {
                    active.first_name = Set(normalize_text(first_name));
                }
                if let Some(last_name) = patch.last_name {
                    active.last_name = Set(normalize_text(last_name));
                }
                if let Some(bio) = patch.bio {
                    active.bio = Set(normalize_text(bio));
                }
                if let Some(phone_number) = patch.phone_number {
                    active.phone_number = Set(normalize_text(phone_number));
                }
                if let Some(picture) = patch.profile_picture {
                    active.profile_picture =
                        Set(picture.map(|url| url.trim().to_string()).filter(|url| !url.is_empty()));
                }
            })
            .await
            .map_err(|err| {
                if err.is_unique_violation() {
                    AppError::from(CredentialError::DuplicateEmail)
                } else {
                    self.map_error(CrudOp::Update, err)
                }
            })?;

        tracing::info!(user_id = %user_id, "profile updated");
        let houses = self.houses_of(user_id).await?;
        Ok(UserView::new(user, houses))
    }

    pub async fn record_login(
        &self,
        user_id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<user::Model, AppError> {
        self.dao
            .set_last_login(user_id, at)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }
}
