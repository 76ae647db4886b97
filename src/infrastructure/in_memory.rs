use crate::domain::audit::{AuditEntry, AuditFilter, AuditId, EntityType};
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{AuditStore, PaymentStore};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payments.
///
/// Uses `Arc<RwLock<HashMap<PaymentId, Payment>>>`: lookups share the read
/// lock, `save`/`update`/`delete` take the write lock. Clones share the same map.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn save(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id().clone(), payment);
        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Payment> {
        let payments = self.payments.read().await;
        payments
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("payment", id.as_str()))
    }

    async fn find_all(&self) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut all: Vec<Payment> = payments.values().cloned().collect();
        all.sort_by_key(|p| p.created_at());
        Ok(all)
    }

    async fn update(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        if !payments.contains_key(payment.id()) {
            return Err(PaymentError::not_found("payment", payment.id().as_str()));
        }
        payments.insert(payment.id().clone(), payment);
        Ok(())
    }

    async fn delete(&self, id: &PaymentId) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PaymentError::not_found("payment", id.as_str()))
    }
}

#[derive(Default)]
struct AuditLog {
    /// Entries in save order.
    entries: Vec<AuditEntry>,
    /// Position of each entry in `entries`.
    index: HashMap<AuditId, usize>,
}

/// A thread-safe in-memory store for audit entries.
///
/// Keeps entries in the order they were saved, so entity histories come back
/// oldest first. Saving an entry whose id is already present replaces it in place.
#[derive(Default, Clone)]
pub struct InMemoryAuditStore {
    log: Arc<RwLock<AuditLog>>,
}

impl InMemoryAuditStore {
    /// Creates a new, empty in-memory audit store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn save(&self, entry: AuditEntry) -> Result<()> {
        let mut log = self.log.write().await;
        match log.index.get(entry.id()).copied() {
            Some(pos) => log.entries[pos] = entry,
            None => {
                let pos = log.entries.len();
                log.index.insert(entry.id().clone(), pos);
                log.entries.push(entry);
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &AuditId) -> Result<AuditEntry> {
        let log = self.log.read().await;
        log.index
            .get(id)
            .map(|&pos| log.entries[pos].clone())
            .ok_or_else(|| PaymentError::not_found("audit entry", id.as_str()))
    }

    async fn find_by_entity_id(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>> {
        let filter = AuditFilter::new()
            .with_entity_type(entity_type)
            .with_entity_id(entity_id);
        self.find_by_filter(&filter).await
    }

    async fn find_by_filter(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let log = self.log.read().await;
        Ok(log
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }
}
