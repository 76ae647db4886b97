use crate::domain::audit::{AuditEntry, EntityType};
use crate::domain::audit_service::AuditService;
use crate::domain::payment::{Amount, Payment, PaymentId, Transition};
use crate::domain::payment_service::PaymentService;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Field snapshot recorded as the `new_data` of a `created` audit entry.
#[derive(Debug, Serialize)]
struct PaymentSnapshot<'a> {
    id: &'a str,
    amount: Decimal,
    currency: &'a str,
    description: &'a str,
    status: &'a str,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Payment> for PaymentSnapshot<'a> {
    fn from(payment: &'a Payment) -> Self {
        Self {
            id: payment.id().as_str(),
            amount: payment.amount().value(),
            currency: payment.amount().currency(),
            description: payment.description(),
            status: payment.status().as_str(),
            created_at: payment.created_at(),
        }
    }
}

/// Pairs every accepted payment mutation with exactly one audit entry.
///
/// There is no rollback: when the payment is persisted but its audit entry is
/// not, the call fails with [`PaymentError::AuditNotRecorded`] and the payment
/// keeps its new state.
pub struct PaymentApplicationService {
    payments: PaymentService,
    audits: AuditService,
}

impl PaymentApplicationService {
    pub fn new(payments: PaymentService, audits: AuditService) -> Self {
        Self { payments, audits }
    }

    /// Validates the amount, stores a new pending payment and records its creation.
    pub async fn create_payment(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
        user_id: &str,
    ) -> Result<Payment> {
        let amount = Amount::new(amount, currency)?;
        let payment = self.payments.create_payment(amount, description).await?;

        let snapshot = PaymentSnapshot::from(&payment);
        if let Err(e) = self
            .audits
            .record_payment_created(payment.id().as_str(), user_id, &snapshot)
            .await
        {
            return Err(audit_not_recorded(payment.id(), e));
        }

        tracing::info!(payment_id = %payment.id(), user_id, amount = %payment.amount(), "Payment created");
        Ok(payment)
    }

    pub async fn process_payment(&self, payment_id: &str, user_id: &str) -> Result<Payment> {
        self.apply(payment_id, user_id, Transition::Process).await
    }

    pub async fn complete_payment(&self, payment_id: &str, user_id: &str) -> Result<Payment> {
        self.apply(payment_id, user_id, Transition::Complete).await
    }

    pub async fn fail_payment(&self, payment_id: &str, user_id: &str) -> Result<Payment> {
        self.apply(payment_id, user_id, Transition::Fail).await
    }

    pub async fn cancel_payment(&self, payment_id: &str, user_id: &str) -> Result<Payment> {
        self.apply(payment_id, user_id, Transition::Cancel).await
    }

    pub async fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        self.payments.get_payment(&PaymentId::from(payment_id)).await
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.payments.get_all_payments().await
    }

    /// Audit trail of a payment, oldest first. Unknown ids yield an empty list.
    pub async fn get_payment_audit_history(&self, payment_id: &str) -> Result<Vec<AuditEntry>> {
        self.audits
            .get_audit_history(EntityType::Payment, payment_id)
            .await
    }

    async fn apply(&self, payment_id: &str, user_id: &str, transition: Transition) -> Result<Payment> {
        let id = PaymentId::from(payment_id);
        let old_status = self.payments.get_payment(&id).await?.status();

        let payment = self.payments.transition(&id, transition).await?;

        if let Err(e) = self
            .audits
            .record_payment_status_change(
                payment_id,
                user_id,
                old_status.as_str(),
                transition.target().as_str(),
            )
            .await
        {
            return Err(audit_not_recorded(&id, e));
        }

        tracing::info!(
            payment_id,
            user_id,
            from = %old_status,
            to = %payment.status(),
            "Payment status changed"
        );
        Ok(payment)
    }
}

fn audit_not_recorded(payment_id: &PaymentId, source: PaymentError) -> PaymentError {
    tracing::warn!(%payment_id, error = %source, "Payment mutated without audit entry");
    PaymentError::AuditNotRecorded {
        payment_id: payment_id.to_string(),
        source: Box::new(source),
    }
}
