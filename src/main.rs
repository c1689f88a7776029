use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use voyance::config::AppConfig;
use voyance::db;
use voyance::services::mail::mailgun::MailgunProvider;
use voyance::services::payments::stripe::StripeProvider;
use voyance::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    db::seed::bootstrap(&conn, &config)?;

    if config.stripe_secret_key.is_empty() {
        tracing::warn!("STRIPE_SECRET_KEY not set; payment intents will fail");
    }
    if config.mailgun_api_key.is_empty() || config.mailgun_domain.is_empty() {
        tracing::warn!("Mailgun not configured; transactional emails will fail");
    }

    let payments = StripeProvider::new(config.stripe_secret_key.clone());
    let mailer = MailgunProvider::new(config.mailgun_api_key.clone(), config.mailgun_domain.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        payments: Box::new(payments),
        mailer: Box::new(mailer),
    });

    let app = voyance::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
