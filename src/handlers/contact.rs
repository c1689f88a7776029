use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ContactMessage, MessageStatus};
use crate::state::AppState;

use super::require_admin;

#[derive(Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

// POST /api/contact
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    for (name, value) in [("name", &req.name), ("email", &req.email), ("message", &req.message)] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("missing required field: {name}")));
        }
    }

    let id = {
        let db = state.db.lock().unwrap();
        queries::create_contact_message(
            &db,
            req.name.trim(),
            req.email.trim(),
            req.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            req.message.trim(),
        )?
    };

    tracing::info!(message_id = id, "contact message received");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "ok": true, "id": id }))))
}

// GET /api/contact (admin)
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    require_admin(&state, &headers)?;

    let messages = {
        let db = state.db.lock().unwrap();
        queries::list_contact_messages(&db)?
    };
    Ok(Json(messages))
}

#[derive(Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub status: String,
}

// PUT /api/contact/:id (admin)
pub async fn update_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let status = MessageStatus::parse(&req.status)
        .ok_or_else(|| AppError::Validation(format!("invalid status: {}", req.status)))?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_contact_status(&db, id, status)?
    };
    if !updated {
        return Err(AppError::NotFound(format!("message {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

// DELETE /api/contact/:id (admin)
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_contact_message(&db, id)?
    };
    if !deleted {
        return Err(AppError::NotFound(format!("message {id}")));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}
