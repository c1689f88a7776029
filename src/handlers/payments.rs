use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::db::queries::BookingDetails;
use crate::errors::AppError;
use crate::models::{BookingStatus, PaymentStatus};
use crate::services::notify::{self, BookingEvent};
use crate::services::payments;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub booking_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub booking_id: String,
}

// POST /api/payments/create-intent — the amount is derived from the
// booking's stored price snapshot; nothing the client sends is trusted.
pub async fn create_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_id(&db, &req.booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?
    };

    let amount = payments::to_minor_units(booking.price)
        .ok_or_else(|| anyhow::anyhow!("booking {} has an unusable price", booking.id))?;

    let intent = state
        .payments
        .create_intent(amount, &state.config.currency, &booking.id)
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    {
        let db = state.db.lock().unwrap();
        queries::set_payment_intent(&db, &booking.id, &intent.id)?;
    }

    tracing::info!(
        booking_id = %booking.id,
        intent_id = %intent.id,
        amount,
        "payment intent created"
    );

    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
        amount,
        currency: state.config.currency.clone(),
        booking_id: booking.id,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub payment_intent_id: String,
    pub booking_id: String,
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub success: bool,
    pub booking: BookingDetails,
}

// POST /api/payments/confirm — payment truth comes from the processor,
// never from the request body. Only a processor-reported `succeeded`
// flips the booking to confirmed/paid.
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, AppError> {
    {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_id(&db, &req.booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;
    }

    let intent = state
        .payments
        .retrieve_intent(&req.payment_intent_id)
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    if !intent.succeeded() {
        tracing::warn!(
            booking_id = %req.booking_id,
            intent_id = %req.payment_intent_id,
            status = %intent.status,
            "payment confirmation refused"
        );
        return Err(AppError::PaymentDeclined(intent.status));
    }

    let details = {
        let db = state.db.lock().unwrap();
        let mut booking = queries::get_booking_by_id(&db, &req.booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;
        booking.status = BookingStatus::Confirmed;
        booking.payment_status = PaymentStatus::Paid;
        booking.payment_intent_id = Some(req.payment_intent_id.clone());
        queries::update_booking(&db, &booking)?;

        queries::get_booking_details_by_id(&db, &req.booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?
    };

    tracing::info!(
        booking_id = %details.booking.id,
        intent_id = %req.payment_intent_id,
        "payment confirmed, booking confirmed"
    );

    notify::publish(&state, BookingEvent::Confirmed(details.clone())).await;

    Ok(Json(ConfirmResponse {
        success: true,
        booking: details,
    }))
}
