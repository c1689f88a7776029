use anyhow::Context;
use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::services::auth;

/// Idempotent startup bootstrap: default service catalog and the admin
/// account. Invoked once from `main` after migrations; any failure aborts
/// startup rather than limping on with a half-seeded database.
pub fn bootstrap(conn: &Connection, config: &AppConfig) -> anyhow::Result<()> {
    seed_services(conn)?;
    seed_admin(conn, &config.admin_email, &config.admin_password)?;
    Ok(())
}

struct SeedService {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: &'static str,
    duration: &'static str,
    features: &'static [&'static str],
}

const DEFAULT_SERVICES: &[SeedService] = &[
    SeedService {
        id: "tarot",
        name: "Tarot Reading",
        description: "A full-spread tarot consultation exploring your question in depth.",
        price: "45.00",
        duration: "45 minutes",
        features: &[
            "Full 10-card spread",
            "Written summary after the session",
            "One follow-up question by email",
        ],
    },
    SeedService {
        id: "clairvoyance",
        name: "Clairvoyance Session",
        description: "An intuitive reading focused on the questions you bring.",
        price: "60.00",
        duration: "1 hour",
        features: &[
            "Open-ended consultation",
            "Video or phone session",
            "Recording on request",
        ],
    },
    SeedService {
        id: "numerology",
        name: "Numerology Consultation",
        description: "Your complete numerological chart, calculated and explained.",
        price: "50.00",
        duration: "45 minutes",
        features: &["Full birth chart", "Year-ahead forecast", "Written chart included"],
    },
    SeedService {
        id: "energy-healing",
        name: "Energy Healing",
        description: "A guided energy-rebalancing session.",
        price: "70.00",
        duration: "1 hour",
        features: &["Remote or in person", "Chakra assessment", "Personalised exercises"],
    },
];

fn seed_services(conn: &Connection) -> anyhow::Result<()> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM services", [], |row| row.get(0))
        .context("failed to count services")?;
    if count > 0 {
        return Ok(());
    }

    for svc in DEFAULT_SERVICES {
        let features = serde_json::to_string(svc.features)?;
        conn.execute(
            "INSERT INTO services (id, name, description, price, duration, features, active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
            params![svc.id, svc.name, svc.description, svc.price, svc.duration, features],
        )
        .with_context(|| format!("failed to seed service {}", svc.id))?;
    }

    tracing::info!(count = DEFAULT_SERVICES.len(), "seeded default service catalog");
    Ok(())
}

fn seed_admin(conn: &Connection, email: &str, password: &str) -> anyhow::Result<()> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )
        .context("failed to check admin user")?;
    if exists {
        return Ok(());
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(password, &salt);
    conn.execute(
        "INSERT INTO users (id, email, password_hash, password_salt, first_name, last_name, role, active)
         VALUES (?1, ?2, ?3, ?4, 'Admin', '', 'admin', 1)",
        params![uuid::Uuid::new_v4().to_string(), email, hash, salt],
    )
    .context("failed to seed admin user")?;

    tracing::info!(email, "created admin account");
    Ok(())
}
