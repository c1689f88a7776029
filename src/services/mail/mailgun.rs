use anyhow::Context;
use async_trait::async_trait;

use super::{MailTransport, OutgoingEmail};

pub struct MailgunProvider {
    api_key: String,
    domain: String,
    client: reqwest::Client,
}

impl MailgunProvider {
    pub fn new(api_key: String, domain: String) -> Self {
        Self {
            api_key,
            domain,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailTransport for MailgunProvider {
    async fn send(&self, from: &str, email: &OutgoingEmail) -> anyhow::Result<()> {
        let url = format!("https://api.mailgun.net/v3/{}/messages", self.domain);

        self.client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("from", from),
                ("to", email.to.as_str()),
                ("subject", email.subject.as_str()),
                ("html", email.html.as_str()),
                ("text", email.text.as_str()),
            ])
            .send()
            .await
            .context("failed to reach Mailgun")?
            .error_for_status()
            .context("Mailgun API returned error")?;

        Ok(())
    }
}
