use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::db::queries::BookingDetails;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, PaymentStatus};
use crate::services::booking::{self, NewBooking};
use crate::services::notify::{self, BookingEvent};
use crate::state::AppState;

use super::{authenticate, require_admin};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub booking_type: Option<String>,
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        booking::create_booking(
            &db,
            NewBooking {
                service_id: req.service_id,
                date: req.date,
                time: req.time,
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
                address: req.address,
                message: req.message,
                booking_type: req.booking_type,
            },
        )?
    };

    tracing::info!(
        booking_id = %booking.id,
        service = %booking.service_id,
        date = %booking.date,
        time = %booking.time,
        "booking created"
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/:token — accepts a booking id or a confirmation
// token; the payment page knows the id before the token reaches the UI.
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<BookingDetails>, AppError> {
    let details = {
        let db = state.db.lock().unwrap();
        match queries::get_booking_details_by_id(&db, &key)? {
            Some(details) => Some(details),
            None => queries::get_booking_details_by_token(&db, &key)?,
        }
    };

    details
        .map(Json)
        .ok_or_else(|| AppError::NotFound("booking".to_string()))
}

// GET /api/bookings/token/:token — the magic-link lookup emailed to
// guests; matches the confirmation token only.
pub async fn get_booking_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<BookingDetails>, AppError> {
    let details = {
        let db = state.db.lock().unwrap();
        queries::get_booking_details_by_token(&db, &token)?
    };

    details
        .map(Json)
        .ok_or_else(|| AppError::NotFound("booking".to_string()))
}

// GET /api/bookings/my
pub async fn get_my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let user = authenticate(&state, &headers)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_bookings_by_email(&db, &user.email)?
    };

    Ok(Json(bookings))
}

// GET /api/bookings (admin)
pub async fn get_all_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    require_admin(&state, &headers)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db)?
    };

    Ok(Json(bookings))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub visio_link: Option<String>,
}

// PUT /api/bookings/id/:id (admin) — partial update; only the provided
// fields are applied. A fresh transition into cancelled emails the
// customer exactly once.
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingDetails>, AppError> {
    require_admin(&state, &headers)?;

    let (details, previous_status) = {
        let db = state.db.lock().unwrap();

        let mut booking = queries::get_booking_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;
        let previous_status = booking.status;

        if let Some(raw) = &req.status {
            booking.status = BookingStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid status: {raw}")))?;
        }
        if let Some(raw) = &req.payment_status {
            booking.payment_status = PaymentStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid paymentStatus: {raw}")))?;
        }
        if let Some(raw) = &req.visio_link {
            booking.visio_link = booking::normalize_visio_link(raw);
        }

        queries::update_booking(&db, &booking)?;
        let details = queries::get_booking_details_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;
        (details, previous_status)
    };

    // Only a fresh transition emails; re-cancelling an already cancelled
    // booking stays silent.
    if details.booking.status == BookingStatus::Cancelled
        && previous_status != BookingStatus::Cancelled
    {
        notify::publish(&state, BookingEvent::Cancelled(details.clone())).await;
    }

    Ok(Json(details))
}

// DELETE /api/bookings/id/:id (admin) — the cancellation email goes out
// first, unconditionally, then the row disappears.
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let details = {
        let db = state.db.lock().unwrap();
        queries::get_booking_details_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?
    };

    notify::publish(&state, BookingEvent::Cancelled(details)).await;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_booking(&db, &id)?
    };
    if !deleted {
        return Err(AppError::NotFound("booking".to_string()));
    }

    tracing::info!(booking_id = %id, "booking deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}
