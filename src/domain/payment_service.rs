use super::payment::{Amount, Payment, PaymentId, Transition};
use super::ports::PaymentStoreBox;
use crate::error::Result;

/// Fetch-mutate-persist orchestration over a [`PaymentStore`](super::ports::PaymentStore).
///
/// No lock is held across the three steps. Two concurrent transitions on the
/// same payment can both read the same status and the later `update` wins.
pub struct PaymentService {
    store: PaymentStoreBox,
}

impl PaymentService {
    pub fn new(store: PaymentStoreBox) -> Self {
        Self { store }
    }

    pub async fn create_payment(&self, amount: Amount, description: &str) -> Result<Payment> {
        let payment = Payment::new(amount, description);
        self.store.save(payment.clone()).await?;
        tracing::debug!(payment_id = %payment.id(), amount = %payment.amount(), "Payment created");
        Ok(payment)
    }

    pub async fn get_payment(&self, id: &PaymentId) -> Result<Payment> {
        self.store.find_by_id(id).await
    }

    pub async fn get_all_payments(&self) -> Result<Vec<Payment>> {
        self.store.find_all().await
    }

    pub async fn process_payment(&self, id: &PaymentId) -> Result<Payment> {
        self.transition(id, Transition::Process).await
    }

    pub async fn complete_payment(&self, id: &PaymentId) -> Result<Payment> {
        self.transition(id, Transition::Complete).await
    }

    pub async fn fail_payment(&self, id: &PaymentId) -> Result<Payment> {
        self.transition(id, Transition::Fail).await
    }

    pub async fn cancel_payment(&self, id: &PaymentId) -> Result<Payment> {
        self.transition(id, Transition::Cancel).await
    }

    /// Loads the payment, applies `transition` and writes it back.
    pub async fn transition(&self, id: &PaymentId, transition: Transition) -> Result<Payment> {
        let mut payment = self.store.find_by_id(id).await?;
        transition.apply(&mut payment)?;
        self.store.update(payment.clone()).await?;
        tracing::debug!(payment_id = %id, %transition, status = %payment.status(), "Payment updated");
        Ok(payment)
    }
}
