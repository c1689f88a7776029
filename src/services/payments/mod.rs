pub mod stripe;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// The processor's view of an in-progress charge. `client_secret` is only
/// present on intents we created ourselves; `status` is the processor's
/// vocabulary (`succeeded`, `requires_payment_method`, ...).
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

impl PaymentIntent {
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        booking_id: &str,
    ) -> anyhow::Result<PaymentIntent>;

    async fn retrieve_intent(&self, intent_id: &str) -> anyhow::Result<PaymentIntent>;
}

/// Decimal price -> minor currency units (45.00 -> 4500). Fails only on
/// amounts far outside anything a service could cost.
pub fn to_minor_units(price: Decimal) -> Option<i64> {
    (price * Decimal::ONE_HUNDRED).round().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units("45.00".parse().unwrap()), Some(4500));
        assert_eq!(to_minor_units("60".parse().unwrap()), Some(6000));
        assert_eq!(to_minor_units("0.50".parse().unwrap()), Some(50));
        assert_eq!(to_minor_units("19.99".parse().unwrap()), Some(1999));
    }

    #[test]
    fn test_succeeded() {
        let intent = PaymentIntent {
            id: "pi_1".to_string(),
            client_secret: None,
            status: "succeeded".to_string(),
            amount: 4500,
            currency: "eur".to_string(),
        };
        assert!(intent.succeeded());

        let pending = PaymentIntent {
            status: "requires_payment_method".to_string(),
            ..intent
        };
        assert!(!pending.succeeded());
    }
}
