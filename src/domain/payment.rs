use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier of a payment.
///
/// Generated once when the payment is created and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    /// Generates a fresh, globally unique identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for PaymentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PaymentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated monetary quantity: a non-negative value and a currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    value: Decimal,
    currency: String,
}

impl Amount {
    pub fn new(value: Decimal, currency: impl Into<String>) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(PaymentError::ValidationError(
                "amount cannot be negative".to_string(),
            ));
        }
        let currency = currency.into();
        if currency.is_empty() {
            return Err(PaymentError::ValidationError(
                "currency cannot be empty".to_string(),
            ));
        }
        Ok(Self { value, currency })
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "processing" => Ok(PaymentStatus::Processing),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            _ => Err(PaymentError::ValidationError(format!(
                "unknown payment status: {s}"
            ))),
        }
    }
}

/// The four guarded operations that move a payment through its lifecycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Transition {
    Process,
    Complete,
    Fail,
    Cancel,
}

impl Transition {
    /// Status the payment ends up in when the transition is accepted.
    pub fn target(&self) -> PaymentStatus {
        match self {
            Transition::Process => PaymentStatus::Processing,
            Transition::Complete => PaymentStatus::Completed,
            Transition::Fail => PaymentStatus::Failed,
            Transition::Cancel => PaymentStatus::Cancelled,
        }
    }

    pub fn apply(&self, payment: &mut Payment) -> Result<()> {
        match self {
            Transition::Process => payment.process(),
            Transition::Complete => payment.complete(),
            Transition::Fail => payment.fail(),
            Transition::Cancel => payment.cancel(),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Process => "process",
            Transition::Complete => "complete",
            Transition::Fail => "fail",
            Transition::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// A payment moving through `pending -> processing -> completed`, with
/// `failed` and `cancelled` as side exits.
///
/// State is only changed through the guarded transition methods; a rejected
/// transition leaves the payment untouched.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    id: PaymentId,
    amount: Amount,
    description: String,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(amount: Amount, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new(),
            amount,
            description: description.into(),
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &PaymentId {
        &self.id
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves a pending payment into processing.
    pub fn process(&mut self) -> Result<()> {
        if self.status != PaymentStatus::Pending {
            return Err(PaymentError::InvalidTransition(
                "payment can only be processed from pending status".to_string(),
            ));
        }
        self.set_status(PaymentStatus::Processing);
        Ok(())
    }

    /// Completes a payment that is being processed.
    pub fn complete(&mut self) -> Result<()> {
        if self.status != PaymentStatus::Processing {
            return Err(PaymentError::InvalidTransition(
                "payment can only be completed from processing status".to_string(),
            ));
        }
        self.set_status(PaymentStatus::Completed);
        Ok(())
    }

    /// Marks the payment as failed. Allowed from every status except completed,
    /// including failed itself.
    pub fn fail(&mut self) -> Result<()> {
        if self.status == PaymentStatus::Completed {
            return Err(PaymentError::InvalidTransition(
                "completed payment cannot be failed".to_string(),
            ));
        }
        self.set_status(PaymentStatus::Failed);
        Ok(())
    }

    /// Cancels the payment. Allowed from pending, failed and cancelled.
    pub fn cancel(&mut self) -> Result<()> {
        if matches!(
            self.status,
            PaymentStatus::Processing | PaymentStatus::Completed
        ) {
            return Err(PaymentError::InvalidTransition(
                "payment cannot be cancelled in current status".to_string(),
            ));
        }
        self.set_status(PaymentStatus::Cancelled);
        Ok(())
    }

    fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
        // Wall clock may step backwards; updated_at must not.
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::thread::sleep;
    use std::time::Duration;

    const ALL_STATUSES: [PaymentStatus; 5] = [
        PaymentStatus::Pending,
        PaymentStatus::Processing,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Cancelled,
    ];

    fn payment_in(status: PaymentStatus) -> Payment {
        let mut payment = Payment::new(Amount::new(dec!(100.0), "USD").unwrap(), "test payment");
        payment.status = status;
        payment
    }

    /// Runs `transition` from every status and checks it against the allowed set.
    fn check_transition(transition: Transition, allowed: &[PaymentStatus], message: &str) {
        for from in ALL_STATUSES {
            let mut payment = payment_in(from);
            let before = payment.clone();
            sleep(Duration::from_millis(2));

            let result = transition.apply(&mut payment);

            if allowed.contains(&from) {
                assert!(result.is_ok(), "{transition} from {from} should succeed");
                assert_eq!(payment.status(), transition.target());
                assert!(payment.updated_at() > before.updated_at());
                assert_eq!(payment.created_at(), before.created_at());
            } else {
                let err = result.expect_err("transition should be rejected");
                assert!(matches!(err, PaymentError::InvalidTransition(_)));
                assert_eq!(err.to_string(), message);
                assert_eq!(payment, before, "rejected {transition} must not mutate");
            }
        }
    }

    #[test]
    fn test_amount_validation() {
        let amount = Amount::new(dec!(100.50), "USD").unwrap();
        assert_eq!(amount.value(), dec!(100.50));
        assert_eq!(amount.currency(), "USD");

        assert!(Amount::new(dec!(0), "EUR").is_ok());
        assert!(Amount::new(dec!(999999.99), "JPY").is_ok());

        let err = Amount::new(dec!(-10.50), "USD").unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(_)));
        assert_eq!(err.to_string(), "amount cannot be negative");

        let err = Amount::new(dec!(100.50), "").unwrap_err();
        assert_eq!(err.to_string(), "currency cannot be empty");
    }

    #[test]
    fn test_status_labels() {
        for status in ALL_STATUSES {
            assert_eq!(status.to_string().parse::<PaymentStatus>().unwrap(), status);
        }
        assert_eq!(PaymentStatus::Cancelled.as_str(), "cancelled");
        assert!("refunded".parse::<PaymentStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn test_new_payment_is_pending() {
        let before = Utc::now();
        let payment = Payment::new(Amount::new(dec!(50.00), "EUR").unwrap(), "");
        let after = Utc::now();

        assert!(!payment.id().as_str().is_empty());
        assert_eq!(payment.status(), PaymentStatus::Pending);
        assert_eq!(payment.description(), "");
        assert_eq!(payment.amount().currency(), "EUR");
        assert_eq!(payment.created_at(), payment.updated_at());
        assert!(payment.created_at() >= before && payment.created_at() <= after);
    }

    #[test]
    fn test_payment_ids_are_unique() {
        let amount = Amount::new(dec!(1), "USD").unwrap();
        let a = Payment::new(amount.clone(), "a");
        let b = Payment::new(amount, "b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_payment_id_from_string() {
        for raw in ["123e4567-e89b-12d3-a456-426614174000", "", "test-payment-id"] {
            assert_eq!(PaymentId::from(raw).as_str(), raw);
        }
    }

    #[test]
    fn test_process_guard() {
        check_transition(
            Transition::Process,
            &[PaymentStatus::Pending],
            "payment can only be processed from pending status",
        );
    }

    #[test]
    fn test_complete_guard() {
        check_transition(
            Transition::Complete,
            &[PaymentStatus::Processing],
            "payment can only be completed from processing status",
        );
    }

    #[test]
    fn test_fail_guard_allows_self_loop() {
        check_transition(
            Transition::Fail,
            &[
                PaymentStatus::Pending,
                PaymentStatus::Processing,
                PaymentStatus::Failed,
                PaymentStatus::Cancelled,
            ],
            "completed payment cannot be failed",
        );
    }

    #[test]
    fn test_cancel_guard_allows_self_loop() {
        check_transition(
            Transition::Cancel,
            &[
                PaymentStatus::Pending,
                PaymentStatus::Failed,
                PaymentStatus::Cancelled,
            ],
            "payment cannot be cancelled in current status",
        );
    }

    #[test]
    fn test_full_lifecycle() {
        let mut payment = payment_in(PaymentStatus::Pending);
        payment.process().unwrap();
        payment.complete().unwrap();
        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert!(payment.cancel().is_err());
        assert!(payment.fail().is_err());
        assert!(payment.updated_at() >= payment.created_at());
    }
}
