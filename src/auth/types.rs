use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored on every user. Nothing is gated on it yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub id: Uuid,
    pub iat: u64,
    pub exp: u64,
}

/// Verified caller, bound to the request by the identity middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
}
