use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::models::{
    BlogPost, Booking, BookingStatus, BookingType, ContactMessage, MessageStatus, PaymentStatus,
    PostStatus, Role, Service, User,
};

const DT_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn now_str() -> String {
    Utc::now().naive_utc().format(DT_FMT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DT_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_price(s: &str) -> anyhow::Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|e| anyhow::anyhow!("invalid stored price {s:?}: {e}"))
}

// ── Services ──

const SERVICE_COLS: &str =
    "id, name, description, price, duration, features, active, created_at, updated_at";

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let price_str: String = row.get(3)?;
    let features_json: String = row.get(5)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: parse_price(&price_str)?,
        duration: row.get(4)?,
        features: serde_json::from_str(&features_json).unwrap_or_default(),
        active: row.get::<_, i32>(6)? != 0,
        created_at: parse_dt(&created_at),
        updated_at: parse_dt(&updated_at),
    })
}

pub fn list_services(conn: &Connection, include_inactive: bool) -> anyhow::Result<Vec<Service>> {
    let sql = if include_inactive {
        format!("SELECT {SERVICE_COLS} FROM services ORDER BY name ASC")
    } else {
        format!("SELECT {SERVICE_COLS} FROM services WHERE active = 1 ORDER BY name ASC")
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

pub fn get_service(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        &format!("SELECT {SERVICE_COLS} FROM services WHERE id = ?1"),
        params![id],
        |row| Ok(parse_service_row(row)),
    );

    match result {
        Ok(service) => Ok(Some(service?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    let features = serde_json::to_string(&service.features)?;
    conn.execute(
        "INSERT INTO services (id, name, description, price, duration, features, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            service.id,
            service.name,
            service.description,
            service.price.to_string(),
            service.duration,
            features,
            service.active as i32,
            service.created_at.format(DT_FMT).to_string(),
            service.updated_at.format(DT_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let features = serde_json::to_string(&service.features)?;
    let count = conn.execute(
        "UPDATE services SET name = ?1, description = ?2, price = ?3, duration = ?4,
                features = ?5, active = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            service.name,
            service.description,
            service.price.to_string(),
            service.duration,
            features,
            service.active as i32,
            now_str(),
            service.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_bookings_for_service(conn: &Connection, service_id: &str) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE service_id = ?1",
        params![service_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Bookings ──

const BOOKING_COLS: &str = "id, service_id, date, time, first_name, last_name, email, phone, \
     address, message, booking_type, status, payment_status, price, confirmation_token, \
     payment_intent_id, visio_link, created_at, updated_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let booking_type: String = row.get(10)?;
    let status: String = row.get(11)?;
    let payment_status: String = row.get(12)?;
    let price: String = row.get(13)?;
    let created_at: String = row.get(17)?;
    let updated_at: String = row.get(18)?;

    Ok(Booking {
        id: row.get(0)?,
        service_id: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        email: row.get(6)?,
        phone: row.get(7)?,
        address: row.get(8)?,
        message: row.get(9)?,
        booking_type: BookingType::parse(&booking_type).unwrap_or(BookingType::Guest),
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
        payment_status: PaymentStatus::parse(&payment_status).unwrap_or(PaymentStatus::Pending),
        price: parse_price(&price)?,
        confirmation_token: row.get(14)?,
        payment_intent_id: row.get(15)?,
        visio_link: row.get(16)?,
        created_at: parse_dt(&created_at),
        updated_at: parse_dt(&updated_at),
    })
}

/// A booking joined with the catalog fields the confirmation page and the
/// admin list both display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub service_name: String,
    pub service_duration: String,
    pub service_price: Decimal,
}

fn parse_booking_details_row(row: &rusqlite::Row) -> anyhow::Result<BookingDetails> {
    let booking = parse_booking_row(row)?;
    let service_name: String = row.get(19)?;
    let service_duration: String = row.get(20)?;
    let service_price: String = row.get(21)?;

    Ok(BookingDetails {
        booking,
        service_name,
        service_duration,
        service_price: parse_price(&service_price)?,
    })
}

fn booking_details_sql(where_clause: &str, order_clause: &str) -> String {
    let cols: String = BOOKING_COLS
        .split(", ")
        .map(|c| format!("b.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {cols}, s.name, s.duration, s.price
         FROM bookings b JOIN services s ON s.id = b.service_id
         {where_clause} {order_clause}"
    )
}

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
        ),
        params![
            booking.id,
            booking.service_id,
            booking.date,
            booking.time,
            booking.first_name,
            booking.last_name,
            booking.email,
            booking.phone,
            booking.address,
            booking.message,
            booking.booking_type.as_str(),
            booking.status.as_str(),
            booking.payment_status.as_str(),
            booking.price.to_string(),
            booking.confirmation_token,
            booking.payment_intent_id,
            booking.visio_link,
            booking.created_at.format(DT_FMT).to_string(),
            booking.updated_at.format(DT_FMT).to_string(),
        ],
    )?;
    Ok(())
}

/// True when the insert failed on the partial unique slot index, i.e. a
/// concurrent request won the (date, time) pair between our availability
/// check and the insert.
pub fn is_slot_conflict(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<rusqlite::Error>() {
        Some(rusqlite::Error::SqliteFailure(e, msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg
                    .as_deref()
                    .map(|m| m.contains("bookings.date") || m.contains("idx_bookings_slot"))
                    .unwrap_or(false)
        }
        _ => false,
    }
}

pub fn slot_taken(conn: &Connection, date: &str, time: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE date = ?1 AND time = ?2 AND status != 'cancelled'",
        params![date, time],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn booked_times_for_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT time FROM bookings WHERE date = ?1 AND status != 'cancelled' ORDER BY time ASC",
    )?;
    let rows = stmt.query_map(params![date], |row| row.get::<_, String>(0))?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_booking_details_by_id(
    conn: &Connection,
    id: &str,
) -> anyhow::Result<Option<BookingDetails>> {
    let result = conn.query_row(
        &booking_details_sql("WHERE b.id = ?1", ""),
        params![id],
        |row| Ok(parse_booking_details_row(row)),
    );

    match result {
        Ok(details) => Ok(Some(details?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_booking_details_by_token(
    conn: &Connection,
    token: &str,
) -> anyhow::Result<Option<BookingDetails>> {
    let result = conn.query_row(
        &booking_details_sql("WHERE b.confirmation_token = ?1", ""),
        params![token],
        |row| Ok(parse_booking_details_row(row)),
    );

    match result {
        Ok(details) => Ok(Some(details?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<BookingDetails>> {
    let sql = booking_details_sql("", "ORDER BY b.created_at DESC, b.id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_details_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_bookings_by_email(conn: &Connection, email: &str) -> anyhow::Result<Vec<BookingDetails>> {
    let sql = booking_details_sql("WHERE b.email = ?1", "ORDER BY b.date DESC, b.time DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![email], |row| Ok(parse_booking_details_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Persists the mutable booking fields (status, payment status, processor
/// reference, visio link). Callers fetch, mutate, then save.
pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, payment_status = ?2, payment_intent_id = ?3,
                visio_link = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            booking.status.as_str(),
            booking.payment_status.as_str(),
            booking.payment_intent_id,
            booking.visio_link,
            now_str(),
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn set_payment_intent(conn: &Connection, booking_id: &str, intent_id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET payment_intent_id = ?1, updated_at = ?2 WHERE id = ?3",
        params![intent_id, now_str(), booking_id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Users ──

const USER_COLS: &str =
    "id, email, password_hash, password_salt, first_name, last_name, role, active, created_at";

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let role: String = row.get(6)?;
    let created_at: String = row.get(8)?;

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        password_salt: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        role: Role::parse(&role).unwrap_or(Role::Client),
        active: row.get::<_, i32>(7)? != 0,
        created_at: parse_dt(&created_at),
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
        params![id],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
        params![email],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        &format!("INSERT INTO users ({USER_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
        params![
            user.id,
            user.email,
            user.password_hash,
            user.password_salt,
            user.first_name,
            user.last_name,
            user.role.as_str(),
            user.active as i32,
            user.created_at.format(DT_FMT).to_string(),
        ],
    )?;
    Ok(())
}

// ── Blog posts ──

const POST_COLS: &str =
    "id, title, slug, excerpt, content, status, published_at, created_at, updated_at";

fn parse_post_row(row: &rusqlite::Row) -> anyhow::Result<BlogPost> {
    let status: String = row.get(5)?;
    let published_at: Option<String> = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(BlogPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        excerpt: row.get(3)?,
        content: row.get(4)?,
        status: PostStatus::parse(&status).unwrap_or(PostStatus::Draft),
        published_at: published_at.as_deref().map(parse_dt),
        created_at: parse_dt(&created_at),
        updated_at: parse_dt(&updated_at),
    })
}

pub fn list_posts(conn: &Connection, published_only: bool) -> anyhow::Result<Vec<BlogPost>> {
    let sql = if published_only {
        format!(
            "SELECT {POST_COLS} FROM blog_posts WHERE status = 'published'
             ORDER BY published_at DESC"
        )
    } else {
        format!("SELECT {POST_COLS} FROM blog_posts ORDER BY created_at DESC")
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_post_row(row)))?;

    let mut posts = vec![];
    for row in rows {
        posts.push(row??);
    }
    Ok(posts)
}

pub fn get_post_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<BlogPost>> {
    let result = conn.query_row(
        &format!("SELECT {POST_COLS} FROM blog_posts WHERE id = ?1"),
        params![id],
        |row| Ok(parse_post_row(row)),
    );

    match result {
        Ok(post) => Ok(Some(post?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_published_post_by_slug(
    conn: &Connection,
    slug: &str,
) -> anyhow::Result<Option<BlogPost>> {
    let result = conn.query_row(
        &format!("SELECT {POST_COLS} FROM blog_posts WHERE slug = ?1 AND status = 'published'"),
        params![slug],
        |row| Ok(parse_post_row(row)),
    );

    match result {
        Ok(post) => Ok(Some(post?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn slug_exists(conn: &Connection, slug: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM blog_posts WHERE slug = ?1",
        params![slug],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn create_post(conn: &Connection, post: &BlogPost) -> anyhow::Result<()> {
    conn.execute(
        &format!("INSERT INTO blog_posts ({POST_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
        params![
            post.id,
            post.title,
            post.slug,
            post.excerpt,
            post.content,
            post.status.as_str(),
            post.published_at.map(|dt| dt.format(DT_FMT).to_string()),
            post.created_at.format(DT_FMT).to_string(),
            post.updated_at.format(DT_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn update_post(conn: &Connection, post: &BlogPost) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE blog_posts SET title = ?1, slug = ?2, excerpt = ?3, content = ?4,
                status = ?5, published_at = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            post.title,
            post.slug,
            post.excerpt,
            post.content,
            post.status.as_str(),
            post.published_at.map(|dt| dt.format(DT_FMT).to_string()),
            now_str(),
            post.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_post(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM blog_posts WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Contact messages ──

const CONTACT_COLS: &str = "id, name, email, subject, message, status, created_at";

fn parse_contact_row(row: &rusqlite::Row) -> anyhow::Result<ContactMessage> {
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        status: MessageStatus::parse(&status).unwrap_or(MessageStatus::New),
        created_at: parse_dt(&created_at),
    })
}

pub fn create_contact_message(
    conn: &Connection,
    name: &str,
    email: &str,
    subject: Option<&str>,
    message: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO contact_messages (name, email, subject, message, status, created_at)
         VALUES (?1, ?2, ?3, ?4, 'new', ?5)",
        params![name, email, subject, message, now_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_contact_messages(conn: &Connection) -> anyhow::Result<Vec<ContactMessage>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLS} FROM contact_messages ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], |row| Ok(parse_contact_row(row)))?;

    let mut messages = vec![];
    for row in rows {
        messages.push(row??);
    }
    Ok(messages)
}

pub fn update_contact_status(
    conn: &Connection,
    id: i64,
    status: MessageStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE contact_messages SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_contact_message(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM contact_messages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO services (id, name, description, price, duration, features, active)
             VALUES ('tarot', 'Tarot Reading', '', '45.00', '45 minutes', '[]', 1)",
            [],
        )
        .unwrap();
        conn
    }

    fn sample_booking(id: &str, date: &str, time: &str) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            service_id: "tarot".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            first_name: "Marie".to_string(),
            last_name: "Dupont".to_string(),
            email: "marie@example.com".to_string(),
            phone: "+33612345678".to_string(),
            address: None,
            message: None,
            booking_type: BookingType::Guest,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            price: "45.00".parse().unwrap(),
            confirmation_token: format!("tok-{id}"),
            payment_intent_id: None,
            visio_link: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_booking_round_trip() {
        let conn = setup();
        let booking = sample_booking("b1", "2025-09-16", "14:00");
        create_booking(&conn, &booking).unwrap();

        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.service_id, "tarot");
        assert_eq!(loaded.status, BookingStatus::Pending);
        assert_eq!(loaded.payment_status, PaymentStatus::Pending);
        assert_eq!(loaded.price, "45.00".parse().unwrap());
    }

    #[test]
    fn test_details_lookup_by_id_and_token_agree() {
        let conn = setup();
        create_booking(&conn, &sample_booking("b1", "2025-09-16", "14:00")).unwrap();

        let by_id = get_booking_details_by_id(&conn, "b1").unwrap().unwrap();
        let by_token = get_booking_details_by_token(&conn, "tok-b1").unwrap().unwrap();
        assert_eq!(by_id.booking.id, by_token.booking.id);
        assert_eq!(by_id.service_name, "Tarot Reading");
        assert_eq!(by_id.service_duration, "45 minutes");
    }

    #[test]
    fn test_slot_conflict_detection() {
        let conn = setup();
        create_booking(&conn, &sample_booking("b1", "2025-09-16", "14:00")).unwrap();

        let err = create_booking(&conn, &sample_booking("b2", "2025-09-16", "14:00")).unwrap_err();
        assert!(is_slot_conflict(&err));

        // A different slot on the same day is fine.
        create_booking(&conn, &sample_booking("b3", "2025-09-16", "14:30")).unwrap();
    }

    #[test]
    fn test_cancelled_booking_frees_slot() {
        let conn = setup();
        let mut booking = sample_booking("b1", "2025-09-16", "14:00");
        create_booking(&conn, &booking).unwrap();

        booking.status = BookingStatus::Cancelled;
        assert!(update_booking(&conn, &booking).unwrap());
        assert!(!slot_taken(&conn, "2025-09-16", "14:00").unwrap());

        create_booking(&conn, &sample_booking("b2", "2025-09-16", "14:00")).unwrap();
    }

    #[test]
    fn test_price_snapshot_survives_service_change() {
        let conn = setup();
        create_booking(&conn, &sample_booking("b1", "2025-09-16", "14:00")).unwrap();

        let mut service = get_service(&conn, "tarot").unwrap().unwrap();
        service.price = "99.00".parse().unwrap();
        update_service(&conn, &service).unwrap();

        let booking = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(booking.price, "45.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_booked_times_excludes_cancelled() {
        let conn = setup();
        create_booking(&conn, &sample_booking("b1", "2025-09-16", "09:00")).unwrap();
        let mut cancelled = sample_booking("b2", "2025-09-16", "15:00");
        create_booking(&conn, &cancelled).unwrap();
        cancelled.status = BookingStatus::Cancelled;
        update_booking(&conn, &cancelled).unwrap();

        let times = booked_times_for_date(&conn, "2025-09-16").unwrap();
        assert_eq!(times, vec!["09:00".to_string()]);
    }

    #[test]
    fn test_contact_message_lifecycle() {
        let conn = setup();
        let id = create_contact_message(&conn, "Jean", "jean@example.com", None, "Bonjour").unwrap();

        let messages = list_contact_messages(&conn).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].status, MessageStatus::New);

        assert!(update_contact_status(&conn, id, MessageStatus::Read).unwrap());
        assert!(delete_contact_message(&conn, id).unwrap());
        assert!(list_contact_messages(&conn).unwrap().is_empty());
    }
}
