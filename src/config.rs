use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub auth_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub stripe_secret_key: String,
    pub currency: String,
    pub mailgun_api_key: String,
    pub mailgun_domain: String,
    pub mail_from: String,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "voyance.db".to_string()),
            auth_secret: env::var("AUTH_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@voyance.local".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "eur".to_string()),
            mailgun_api_key: env::var("MAILGUN_API_KEY").unwrap_or_default(),
            mailgun_domain: env::var("MAILGUN_DOMAIN").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Voyance <no-reply@voyance.local>".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
