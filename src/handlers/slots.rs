use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::slots;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<slots::Slot>,
}

// GET /api/calendar/slots?date=YYYY-MM-DD
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("missing required query parameter: date".to_string()))?;

    if slots::parse_date(&date).is_none() {
        return Err(AppError::Validation(format!("invalid date: {date}")));
    }

    let slots = {
        let db = state.db.lock().unwrap();
        slots::slots_for_date(&db, &date)?
    };

    Ok(Json(SlotsResponse { date, slots }))
}
