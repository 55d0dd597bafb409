use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use uuid::Uuid;

use super::Claims;
use crate::{config::AuthConfig, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("token encoding failed")]
    Encode,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

pub fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// HS256 access tokens carrying `{id, iat, exp}`. No refresh, no revocation.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    ttl_secs: u64,
    validation: Validation,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: JwtKeys::from_secret(cfg.jwt_secret.as_bytes()),
            ttl_secs: cfg.token_ttl_secs,
            validation,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, now_unix())
    }

    fn issue_at(&self, user_id: Uuid, iat: u64) -> Result<IssuedToken, TokenError> {
        let claims = Claims {
            id: user_id,
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".into());

        let token = encode(&header, &claims, &self.keys.enc).map_err(|err| {
            tracing::error!(error = %err, "token encoding failed");
            TokenError::Encode
        })?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token, &self.keys.dec, &self.validation)
            .map(|data| data.claims.id)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => {
                AppError::forbidden("Failed to authenticate token")
            }
            TokenError::Encode => AppError::internal("Token issuance failed"),
        }
    }
}
