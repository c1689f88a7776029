use crate::db::queries::BookingDetails;

use super::OutgoingEmail;

/// Confirmation email for a paid booking. Carries the capability link so
/// guests without an account can always get back to their booking.
pub fn confirmation_email(details: &BookingDetails, base_url: &str) -> OutgoingEmail {
    let b = &details.booking;
    let booking_url = format!("{base_url}/booking/{}", b.confirmation_token);
    let visio_line_html = match &b.visio_link {
        Some(link) => format!("<p>Join your session here: <a href=\"{link}\">{link}</a></p>"),
        None => String::new(),
    };
    let visio_line_text = match &b.visio_link {
        Some(link) => format!("Join your session here: {link}\n"),
        None => String::new(),
    };

    let subject = format!("Your booking is confirmed — {}", details.service_name);

    let html = format!(
        "<h2>Thank you, {first_name}!</h2>\
         <p>Your <strong>{service}</strong> ({duration}) is confirmed for \
         <strong>{date}</strong> at <strong>{time}</strong>.</p>\
         <p>Amount paid: {price} &euro;</p>\
         {visio_line_html}\
         <p>You can review your booking at any time: <a href=\"{url}\">{url}</a></p>",
        first_name = b.first_name,
        service = details.service_name,
        duration = details.service_duration,
        date = b.date,
        time = b.time,
        price = b.price,
        url = booking_url,
    );

    let text = format!(
        "Thank you, {first_name}!\n\n\
         Your {service} ({duration}) is confirmed for {date} at {time}.\n\
         Amount paid: {price} EUR\n\
         {visio_line_text}\
         You can review your booking at any time: {url}\n",
        first_name = b.first_name,
        service = details.service_name,
        duration = details.service_duration,
        date = b.date,
        time = b.time,
        price = b.price,
        url = booking_url,
    );

    OutgoingEmail {
        to: b.email.clone(),
        subject,
        html,
        text,
    }
}

pub fn cancellation_email(details: &BookingDetails) -> OutgoingEmail {
    let b = &details.booking;
    let subject = format!("Your booking has been cancelled — {}", details.service_name);

    let html = format!(
        "<h2>Hello {first_name},</h2>\
         <p>Your <strong>{service}</strong> booked for <strong>{date}</strong> at \
         <strong>{time}</strong> has been cancelled.</p>\
         <p>If this is unexpected, just reply to this email and we will sort it out.</p>",
        first_name = b.first_name,
        service = details.service_name,
        date = b.date,
        time = b.time,
    );

    let text = format!(
        "Hello {first_name},\n\n\
         Your {service} booked for {date} at {time} has been cancelled.\n\
         If this is unexpected, just reply to this email and we will sort it out.\n",
        first_name = b.first_name,
        service = details.service_name,
        date = b.date,
        time = b.time,
    );

    OutgoingEmail {
        to: b.email.clone(),
        subject,
        html,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Booking, BookingStatus, BookingType, PaymentStatus};
    use chrono::Utc;

    fn details(visio_link: Option<&str>) -> BookingDetails {
        let now = Utc::now().naive_utc();
        BookingDetails {
            booking: Booking {
                id: "b1".to_string(),
                service_id: "tarot".to_string(),
                date: "2025-09-16".to_string(),
                time: "14:00".to_string(),
                first_name: "Marie".to_string(),
                last_name: "Dupont".to_string(),
                email: "marie@example.com".to_string(),
                phone: "+33612345678".to_string(),
                address: None,
                message: None,
                booking_type: BookingType::Guest,
                status: BookingStatus::Confirmed,
                payment_status: PaymentStatus::Paid,
                price: "45.00".parse().unwrap(),
                confirmation_token: "tok-abc".to_string(),
                payment_intent_id: None,
                visio_link: visio_link.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
            service_name: "Tarot Reading".to_string(),
            service_duration: "45 minutes".to_string(),
            service_price: "45.00".parse().unwrap(),
        }
    }

    #[test]
    fn test_confirmation_email_contents() {
        let email = confirmation_email(&details(None), "https://voyance.example");

        assert_eq!(email.to, "marie@example.com");
        assert!(email.subject.contains("confirmed"));
        assert!(email.subject.contains("Tarot Reading"));
        for body in [&email.html, &email.text] {
            assert!(body.contains("Marie"));
            assert!(body.contains("2025-09-16"));
            assert!(body.contains("14:00"));
            assert!(body.contains("45.00"));
            assert!(body.contains("https://voyance.example/booking/tok-abc"));
        }
    }

    #[test]
    fn test_confirmation_email_includes_visio_link_when_set() {
        let email = confirmation_email(
            &details(Some("https://meet.example.com/abc")),
            "https://voyance.example",
        );
        assert!(email.html.contains("https://meet.example.com/abc"));
        assert!(email.text.contains("https://meet.example.com/abc"));

        let without = confirmation_email(&details(None), "https://voyance.example");
        assert!(!without.html.contains("Join your session"));
    }

    #[test]
    fn test_cancellation_email_contents() {
        let email = cancellation_email(&details(None));

        assert_eq!(email.to, "marie@example.com");
        assert!(email.subject.contains("cancelled"));
        for body in [&email.html, &email.text] {
            assert!(body.contains("Marie"));
            assert!(body.contains("2025-09-16"));
            assert!(body.contains("14:00"));
        }
    }
}
