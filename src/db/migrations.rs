use anyhow::Context;
use rusqlite::Connection;

/// Base schema. Every statement is idempotent so the whole batch can run
/// on every startup; columns added after the initial release go through
/// `add_column_if_missing` below instead of editing the CREATE TABLEs.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS services (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price TEXT NOT NULL,
    duration TEXT NOT NULL DEFAULT '',
    features TEXT NOT NULL DEFAULT '[]',
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    service_id TEXT NOT NULL REFERENCES services(id),
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    address TEXT,
    message TEXT,
    booking_type TEXT NOT NULL DEFAULT 'guest',
    status TEXT NOT NULL DEFAULT 'pending',
    payment_status TEXT NOT NULL DEFAULT 'pending',
    price TEXT NOT NULL,
    confirmation_token TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_slot
    ON bookings(date, time) WHERE status != 'cancelled';

CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(email);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    password_salt TEXT NOT NULL,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL DEFAULT 'client',
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS blog_posts (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    excerpt TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'draft',
    published_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contact_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    subject TEXT,
    message TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'new',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(SCHEMA)
        .context("failed to apply base schema")?;

    // Columns that postdate the initial schema.
    add_column_if_missing(conn, "bookings", "payment_intent_id", "TEXT")?;
    add_column_if_missing(conn, "bookings", "visio_link", "TEXT")?;

    Ok(())
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    decl: &str,
) -> anyhow::Result<()> {
    let mut stmt = conn
        .prepare(&format!("SELECT name FROM pragma_table_info('{table}')"))
        .context("failed to inspect table columns")?;
    let existing: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<_, _>>()?;

    if existing.iter().any(|c| c == column) {
        return Ok(());
    }

    conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl};"))
        .with_context(|| format!("failed to add column {table}.{column}"))?;
    tracing::info!("added column {table}.{column}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = open();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('services', 'bookings', 'users', 'blog_posts', 'contact_messages')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_add_column_if_missing_backfills_old_schema() {
        let conn = open();
        run_migrations(&conn).unwrap();

        // Simulate a pre-upgrade database missing the visio column.
        conn.execute_batch("ALTER TABLE bookings DROP COLUMN visio_link;")
            .unwrap();
        run_migrations(&conn).unwrap();

        let cols: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('bookings')")
            .unwrap()
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(cols.iter().any(|c| c == "visio_link"));
    }

    #[test]
    fn test_slot_index_ignores_cancelled_rows() {
        let conn = open();
        run_migrations(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO services (id, name, price) VALUES ('tarot', 'Tarot', '45.00');
             INSERT INTO bookings (id, service_id, date, time, first_name, last_name, email, phone,
                                   status, price, confirmation_token, created_at, updated_at)
             VALUES ('b1', 'tarot', '2025-09-16', '14:00', 'A', 'B', 'a@b.c', '1',
                     'cancelled', '45.00', 't1', datetime('now'), datetime('now'));",
        )
        .unwrap();

        // Cancelled row does not hold the slot.
        conn.execute_batch(
            "INSERT INTO bookings (id, service_id, date, time, first_name, last_name, email, phone,
                                   status, price, confirmation_token, created_at, updated_at)
             VALUES ('b2', 'tarot', '2025-09-16', '14:00', 'C', 'D', 'c@d.e', '2',
                     'pending', '45.00', 't2', datetime('now'), datetime('now'));",
        )
        .unwrap();

        // A second live row does.
        let err = conn.execute_batch(
            "INSERT INTO bookings (id, service_id, date, time, first_name, last_name, email, phone,
                                   status, price, confirmation_token, created_at, updated_at)
             VALUES ('b3', 'tarot', '2025-09-16', '14:00', 'E', 'F', 'e@f.g', '3',
                     'pending', '45.00', 't3', datetime('now'), datetime('now'));",
        );
        assert!(err.is_err());
    }
}
