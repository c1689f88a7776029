use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::notify::{self, BookingEvent};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationEmailRequest {
    pub booking_id: String,
}

// POST /api/emails/confirmation — re-sends the confirmation email for an
// existing booking. Delivery is best-effort; only an unknown booking is
// an error.
pub async fn send_confirmation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmationEmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let details = {
        let db = state.db.lock().unwrap();
        queries::get_booking_details_by_id(&db, &req.booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?
    };

    notify::publish(&state, BookingEvent::Confirmed(details)).await;

    Ok(Json(serde_json::json!({ "success": true })))
}
