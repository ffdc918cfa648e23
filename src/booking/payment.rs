use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Order;
use crate::error::PaymentError;

/// What the payment collaborator returns. Only `success` is interpreted;
/// `record` is stored verbatim with the completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub success: bool,
    #[serde(default)]
    pub record: serde_json::Value,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirm(
        &self,
        order: &Order,
        details: serde_json::Value,
    ) -> Result<PaymentConfirmation, PaymentError>;
}

/// Accepts every payment after a fixed delay. No money moves.
pub struct SimulatedPaymentGateway {
    latency: Duration,
}

impl SimulatedPaymentGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200))
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn confirm(
        &self,
        order: &Order,
        details: serde_json::Value,
    ) -> Result<PaymentConfirmation, PaymentError> {
        tokio::time::sleep(self.latency).await;
        Ok(PaymentConfirmation {
            success: true,
            record: json!({
                "reference": format!("PAY-{}", order.id),
                "amount": order.price.to_string(),
                "details": details,
            }),
        })
    }
}
