use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    auth::{Identity, TokenService},
    error::AppError,
    state::AppState,
};

/// Resolves the caller from `Authorization: <scheme> <token>`.
pub fn resolve_identity(headers: &HeaderMap, tokens: &TokenService) -> Result<Identity, AppError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("No header provided"))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.split_whitespace().nth(1))
        .ok_or_else(|| AppError::unauthorized("No token provided"))?;

    match tokens.verify(token) {
        Ok(user_id) => Ok(Identity { user_id }),
        Err(err) => {
            tracing::warn!(reason = %err, "token rejected");
            Err(err.into())
        }
    }
}

/// Route layer for protected routers. Binds [`Identity`] to the request or answers 401/403.
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_identity(req.headers(), &state.tokens) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("No header provided"))
    }
}
