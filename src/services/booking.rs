use base64::Engine;
use chrono::Utc;
use rand::Rng;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, BookingType, PaymentStatus};
use crate::services::slots;

/// Validated input for the public booking-submission endpoint.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub booking_type: Option<String>,
}

/// The booking-creation workflow: validate the request, check the slot,
/// snapshot the service price, insert a pending/pending row with a fresh
/// confirmation token. The pre-insert availability check gives the
/// friendly conflict message; the partial unique index on
/// (date, time, non-cancelled) is what actually guarantees the slot.
pub fn create_booking(conn: &Connection, req: NewBooking) -> Result<Booking, AppError> {
    let required = [
        ("serviceId", &req.service_id),
        ("date", &req.date),
        ("time", &req.time),
        ("firstName", &req.first_name),
        ("lastName", &req.last_name),
        ("email", &req.email),
        ("phone", &req.phone),
    ];
    for (name, value) in &required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("missing required field: {name}")));
        }
    }

    if slots::parse_date(&req.date).is_none() {
        return Err(AppError::Validation(format!("invalid date: {}", req.date)));
    }
    if !slots::is_known_slot(&req.time) {
        return Err(AppError::Validation(format!("invalid time slot: {}", req.time)));
    }

    let booking_type = match req.booking_type.as_deref() {
        None | Some("") => BookingType::Guest,
        Some(raw) => BookingType::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("invalid bookingType: {raw}")))?,
    };

    let service = queries::get_service(conn, &req.service_id)?
        .ok_or_else(|| AppError::NotFound(format!("service {}", req.service_id)))?;
    if !service.active {
        return Err(AppError::Validation(format!(
            "service {} is not currently offered",
            service.id
        )));
    }

    if queries::slot_taken(conn, &req.date, &req.time)? {
        return Err(slot_conflict());
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        service_id: service.id,
        date: req.date,
        time: req.time,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email: req.email.trim().to_string(),
        phone: req.phone.trim().to_string(),
        address: req.address.filter(|s| !s.trim().is_empty()),
        message: req.message.filter(|s| !s.trim().is_empty()),
        booking_type,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        price: service.price,
        confirmation_token: generate_confirmation_token(),
        payment_intent_id: None,
        visio_link: None,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = queries::create_booking(conn, &booking) {
        if queries::is_slot_conflict(&e) {
            return Err(slot_conflict());
        }
        return Err(AppError::Internal(e));
    }

    Ok(booking)
}

fn slot_conflict() -> AppError {
    AppError::Conflict("this time slot is already booked".to_string())
}

/// 32 random bytes, URL-safe base64. The token is the only credential a
/// guest booker holds, so it must be unguessable and never enumerable.
pub fn generate_confirmation_token() -> String {
    let mut buf = [0u8; 32];
    rand::thread_rng().fill(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Visio links are admin-entered free text; prefix a scheme when missing
/// so the emailed link is clickable. Empty input clears the link.
pub fn normalize_visio_link(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute_batch(
            "INSERT INTO services (id, name, price, duration, active)
             VALUES ('tarot', 'Tarot Reading', '45.00', '45 minutes', 1);
             INSERT INTO services (id, name, price, duration, active)
             VALUES ('retired', 'Old Offering', '30.00', '30 minutes', 0);",
        )
        .unwrap();
        conn
    }

    fn request() -> NewBooking {
        NewBooking {
            service_id: "tarot".to_string(),
            date: "2025-09-16".to_string(),
            time: "14:00".to_string(),
            first_name: "Marie".to_string(),
            last_name: "Dupont".to_string(),
            email: "marie@example.com".to_string(),
            phone: "+33612345678".to_string(),
            address: None,
            message: None,
            booking_type: None,
        }
    }

    #[test]
    fn test_create_booking_success() {
        let conn = setup();
        let booking = create_booking(&conn, request()).unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.booking_type, BookingType::Guest);
        assert_eq!(booking.price, "45.00".parse().unwrap());
        assert!(booking.confirmation_token.len() >= 32);
    }

    #[test]
    fn test_missing_field_rejected() {
        let conn = setup();
        let mut req = request();
        req.email = "  ".to_string();
        let err = create_booking(&conn, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unknown_service_rejected() {
        let conn = setup();
        let mut req = request();
        req.service_id = "astral-projection".to_string();
        let err = create_booking(&conn, req).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_inactive_service_rejected() {
        let conn = setup();
        let mut req = request();
        req.service_id = "retired".to_string();
        let err = create_booking(&conn, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unknown_time_slot_rejected() {
        let conn = setup();
        let mut req = request();
        req.time = "03:00".to_string();
        let err = create_booking(&conn, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_double_booking_conflicts() {
        let conn = setup();
        create_booking(&conn, request()).unwrap();

        let mut second = request();
        second.first_name = "Jean".to_string();
        second.email = "jean@example.com".to_string();
        let err = create_booking(&conn, second).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_invalid_booking_type_rejected() {
        let conn = setup();
        let mut req = request();
        req.booking_type = Some("robot".to_string());
        let err = create_booking(&conn, req).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_tokens_are_unique_and_long() {
        let a = generate_confirmation_token();
        let b = generate_confirmation_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_normalize_visio_link() {
        assert_eq!(
            normalize_visio_link("meet.example.com/abc").as_deref(),
            Some("https://meet.example.com/abc")
        );
        assert_eq!(
            normalize_visio_link("https://meet.example.com/abc").as_deref(),
            Some("https://meet.example.com/abc")
        );
        assert_eq!(
            normalize_visio_link("http://meet.example.com/abc").as_deref(),
            Some("http://meet.example.com/abc")
        );
        assert_eq!(normalize_visio_link("   "), None);
    }
}
