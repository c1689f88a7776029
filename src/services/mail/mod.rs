pub mod mailgun;
pub mod templates;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, from: &str, email: &OutgoingEmail) -> anyhow::Result<()>;
}
