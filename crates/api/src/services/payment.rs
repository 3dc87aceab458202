//! Stub payment processor.
//!
//! Stands in for a real payment gateway at the external collaborator
//! boundary: `process(amount) -> receipt`. It always succeeds after a
//! fixed delay and has no cancellation or timeout semantics; callers
//! wait unconditionally. A real processor would be substituted here
//! without touching the checkout flow.

use std::time::Duration;

use clementine_core::Price;
use uuid::Uuid;

/// Errors from the payment processor.
///
/// The stub never fails; the variant exists so the checkout flow already
/// handles a declining gateway.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The charge was declined.
    #[error("payment declined: {0}")]
    Declined(String),
}

/// A successful charge.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// Gateway-assigned transaction identifier.
    pub transaction_id: String,
}

/// Fixed-delay, always-approving payment processor.
#[derive(Debug, Clone)]
pub struct PaymentStub {
    delay: Duration,
}

impl PaymentStub {
    /// Create a stub with the given artificial processing delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Charge `amount`, returning a transaction identifier.
    ///
    /// # Errors
    ///
    /// Never fails in the stub implementation.
    pub async fn process(&self, amount: Price) -> Result<PaymentReceipt, PaymentError> {
        tokio::time::sleep(self.delay).await;

        let receipt = PaymentReceipt {
            transaction_id: format!("TXN-{}", Uuid::new_v4().simple()),
        };
        tracing::debug!(
            amount = %amount,
            transaction_id = %receipt.transaction_id,
            "payment approved"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_always_approves() {
        let stub = PaymentStub::new(Duration::ZERO);
        let amount = Price::from_cents(3000).unwrap();

        let receipt = stub.process(amount).await.unwrap();
        assert!(receipt.transaction_id.starts_with("TXN-"));
    }

    #[tokio::test]
    async fn test_transaction_ids_are_unique() {
        let stub = PaymentStub::new(Duration::ZERO);
        let amount = Price::from_cents(100).unwrap();

        let a = stub.process(amount).await.unwrap();
        let b = stub.process(amount).await.unwrap();
        assert_ne!(a.transaction_id, b.transaction_id);
    }
}
