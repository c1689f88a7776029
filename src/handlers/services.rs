use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Service;
use crate::state::AppState;

use super::require_admin;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::list_services(&db, false)?
    };
    Ok(Json(services))
}

// GET /api/services/:id — public; retired offerings are invisible here.
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    let service = {
        let db = state.db.lock().unwrap();
        queries::get_service(&db, &id)?
    };

    match service {
        Some(service) if service.active => Ok(Json(service)),
        _ => Err(AppError::NotFound(format!("service {id}"))),
    }
}

// GET /api/services/all (admin)
pub async fn list_all_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Service>>, AppError> {
    require_admin(&state, &headers)?;

    let services = {
        let db = state.db.lock().unwrap();
        queries::list_services(&db, true)?
    };
    Ok(Json(services))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub active: Option<bool>,
}

// POST /api/services (admin)
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    require_admin(&state, &headers)?;

    let id = req.id.trim().to_lowercase();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AppError::Validation(
            "id must be a non-empty slug (letters, digits, dashes)".to_string(),
        ));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("missing required field: name".to_string()));
    }
    let price = req
        .price
        .ok_or_else(|| AppError::Validation("missing required field: price".to_string()))?;
    if price < Decimal::ZERO {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }

    let now = Utc::now().naive_utc();
    let service = Service {
        id,
        name: req.name.trim().to_string(),
        description: req.description,
        price,
        duration: req.duration,
        features: req.features,
        active: req.active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        if queries::get_service(&db, &service.id)?.is_some() {
            return Err(AppError::Conflict(format!(
                "service {} already exists",
                service.id
            )));
        }
        queries::create_service(&db, &service)?;
    }

    Ok((StatusCode::CREATED, Json(service)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub duration: Option<String>,
    pub features: Option<Vec<String>>,
    pub active: Option<bool>,
}

// PUT /api/services/:id (admin) — partial update.
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    require_admin(&state, &headers)?;

    if let Some(price) = req.price {
        if price < Decimal::ZERO {
            return Err(AppError::Validation("price must not be negative".to_string()));
        }
    }

    let service = {
        let db = state.db.lock().unwrap();
        let mut service = queries::get_service(&db, &id)?
            .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

        if let Some(name) = req.name {
            service.name = name;
        }
        if let Some(description) = req.description {
            service.description = description;
        }
        if let Some(price) = req.price {
            service.price = price;
        }
        if let Some(duration) = req.duration {
            service.duration = duration;
        }
        if let Some(features) = req.features {
            service.features = features;
        }
        if let Some(active) = req.active {
            service.active = active;
        }

        queries::update_service(&db, &service)?;
        service
    };

    Ok(Json(service))
}

// DELETE /api/services/:id (admin) — blocked while bookings reference
// the service; deactivate instead.
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    {
        let db = state.db.lock().unwrap();

        if queries::get_service(&db, &id)?.is_none() {
            return Err(AppError::NotFound(format!("service {id}")));
        }
        if queries::count_bookings_for_service(&db, &id)? > 0 {
            return Err(AppError::Conflict(
                "service has bookings; deactivate it instead of deleting".to_string(),
            ));
        }
        queries::delete_service(&db, &id)?;
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}
