pub mod auth;
pub mod blog;
pub mod bookings;
pub mod contact;
pub mod emails;
pub mod health;
pub mod payments;
pub mod services;
pub mod slots;

use axum::http::HeaderMap;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::auth as tokens;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Resolves the bearer credential to a live user account: valid signature,
/// unexpired, user row present and active.
pub(crate) fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let claims =
        tokens::verify_token(&state.config.auth_secret, token).ok_or(AppError::Unauthorized)?;

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_id(&db, &claims.user_id)?
    };

    match user {
        Some(user) if user.active => Ok(user),
        _ => Err(AppError::Unauthorized),
    }
}

pub(crate) fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let user = authenticate(state, headers)?;
    if user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}
