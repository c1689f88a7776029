use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{PaymentIntent, PaymentProvider};

const API_BASE: &str = "https://api.stripe.com/v1";

pub struct StripeProvider {
    secret_key: String,
    client: reqwest::Client,
}

impl StripeProvider {
    pub fn new(secret_key: String) -> Self {
        Self {
            secret_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct StripeIntentResponse {
    id: String,
    client_secret: Option<String>,
    status: String,
    amount: i64,
    currency: String,
}

impl From<StripeIntentResponse> for PaymentIntent {
    fn from(r: StripeIntentResponse) -> Self {
        PaymentIntent {
            id: r.id,
            client_secret: r.client_secret,
            status: r.status,
            amount: r.amount,
            currency: r.currency,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        booking_id: &str,
    ) -> anyhow::Result<PaymentIntent> {
        let amount_str = amount.to_string();
        let params = [
            ("amount", amount_str.as_str()),
            ("currency", currency),
            ("metadata[booking_id]", booking_id),
            ("automatic_payment_methods[enabled]", "true"),
        ];

        let response: StripeIntentResponse = self
            .client
            .post(format!("{API_BASE}/payment_intents"))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .context("failed to reach Stripe")?
            .error_for_status()
            .context("Stripe rejected payment intent creation")?
            .json()
            .await
            .context("failed to parse Stripe payment intent")?;

        Ok(response.into())
    }

    async fn retrieve_intent(&self, intent_id: &str) -> anyhow::Result<PaymentIntent> {
        let response: StripeIntentResponse = self
            .client
            .get(format!("{API_BASE}/payment_intents/{intent_id}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .context("failed to reach Stripe")?
            .error_for_status()
            .context("Stripe rejected payment intent lookup")?
            .json()
            .await
            .context("failed to parse Stripe payment intent")?;

        Ok(response.into())
    }
}
