use crate::db::queries::BookingDetails;
use crate::services::mail::templates;
use crate::state::AppState;

/// Domain events that carry an outbound email. Handlers construct one at
/// the state transition and hand it to `publish`; nothing else touches
/// the mail transport.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    Confirmed(BookingDetails),
    Cancelled(BookingDetails),
}

impl BookingEvent {
    fn booking_id(&self) -> &str {
        match self {
            BookingEvent::Confirmed(d) | BookingEvent::Cancelled(d) => &d.booking.id,
        }
    }
}

/// Fire-and-forget delivery: a transport failure is logged and swallowed.
/// It never fails the request and never rolls back the state transition
/// that produced the event.
pub async fn publish(state: &AppState, event: BookingEvent) {
    let email = match &event {
        BookingEvent::Confirmed(details) => {
            templates::confirmation_email(details, &state.config.public_base_url)
        }
        BookingEvent::Cancelled(details) => templates::cancellation_email(details),
    };

    match state.mailer.send(&state.config.mail_from, &email).await {
        Ok(()) => {
            tracing::info!(booking_id = %event.booking_id(), to = %email.to, "notification email sent");
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                booking_id = %event.booking_id(),
                to = %email.to,
                "failed to send notification email"
            );
        }
    }
}
