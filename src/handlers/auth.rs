use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::auth as tokens;
use crate::state::AppState;

use super::authenticate;

/// Public projection of a user account; hash and salt never leave the
/// database layer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let user = {
        let db = state.db.lock().unwrap();

        if queries::get_user_by_email(&db, &email)?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let salt = tokens::generate_salt();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: tokens::hash_password(&req.password, &salt),
            password_salt: salt,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            role: Role::Client,
            active: true,
            created_at: Utc::now().naive_utc(),
        };
        queries::create_user(&db, &user)?;
        user
    };

    tracing::info!(user_id = %user.id, "account registered");

    let token = tokens::issue_token(&state.config.auth_secret, &user.id, user.role);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_email(&db, &email)?
    };

    // One error for every failure mode; no account enumeration.
    let user = user.ok_or(AppError::Unauthorized)?;
    if !user.active || !tokens::verify_password(&req.password, &user.password_salt, &user.password_hash)
    {
        return Err(AppError::Unauthorized);
    }

    let token = tokens::issue_token(&state.config.auth_secret, &user.id, user.role);
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, AppError> {
    let user = authenticate(&state, &headers)?;
    Ok(Json(user.into()))
}
