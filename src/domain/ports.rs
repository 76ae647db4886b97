use super::audit::{AuditEntry, AuditFilter, AuditId, EntityType};
use super::payment::{Payment, PaymentId};
use crate::error::Result;
use async_trait::async_trait;

/// Keyed storage for payments.
///
/// Every call is atomic on its own; nothing is locked across calls.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn save(&self, payment: Payment) -> Result<()>;
    /// Fails with `NotFound` when no payment has this id.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Payment>;
    async fn find_all(&self) -> Result<Vec<Payment>>;
    /// Replaces an existing payment. Fails with `NotFound` if it is gone.
    async fn update(&self, payment: Payment) -> Result<()>;
    async fn delete(&self, id: &PaymentId) -> Result<()>;
}

/// Append-oriented storage for audit entries.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn save(&self, entry: AuditEntry) -> Result<()>;
    async fn find_by_id(&self, id: &AuditId) -> Result<AuditEntry>;
    /// History of one entity, oldest first.
    async fn find_by_entity_id(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>>;
    async fn find_by_filter(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>>;
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type AuditStoreBox = Box<dyn AuditStore>;
