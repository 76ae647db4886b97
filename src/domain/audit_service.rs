use super::audit::{ActionType, AuditEntry, AuditFilter, AuditId, EntityType};
use super::ports::AuditStoreBox;
use crate::error::{PaymentError, Result};
use serde::Serialize;
use serde_json::json;

/// Builds audit entries from primitive requests and persists them.
pub struct AuditService {
    store: AuditStoreBox,
}

impl AuditService {
    pub fn new(store: AuditStoreBox) -> Self {
        Self { store }
    }

    /// Records one action. Present payloads must serialize to records; if
    /// either is rejected nothing is persisted.
    pub async fn record_action<O, N>(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        action: ActionType,
        user_id: &str,
        old_data: Option<&O>,
        new_data: Option<&N>,
    ) -> Result<AuditEntry>
    where
        O: Serialize + ?Sized + Sync,
        N: Serialize + ?Sized + Sync,
    {
        let mut entry = AuditEntry::new(entity_type, entity_id, action, user_id);
        if let Some(data) = old_data {
            entry.set_old_data(data)?;
        }
        if let Some(data) = new_data {
            entry.set_new_data(data)?;
        }

        self.store.save(entry.clone()).await?;
        tracing::debug!(
            audit_id = %entry.id(),
            entity_id,
            action = %action,
            user_id,
            "Audit entry recorded"
        );
        Ok(entry)
    }

    pub async fn record_payment_created<T>(
        &self,
        payment_id: &str,
        user_id: &str,
        payment_data: &T,
    ) -> Result<AuditEntry>
    where
        T: Serialize + ?Sized + Sync,
    {
        self.record_action(
            EntityType::Payment,
            payment_id,
            ActionType::Created,
            user_id,
            None::<&()>,
            Some(payment_data),
        )
        .await
    }

    /// Records a status change, deriving the action from the new status label.
    pub async fn record_payment_status_change(
        &self,
        payment_id: &str,
        user_id: &str,
        old_status: &str,
        new_status: &str,
    ) -> Result<AuditEntry> {
        let action = match new_status {
            "processing" => ActionType::Processed,
            "completed" => ActionType::Completed,
            "failed" => ActionType::Failed,
            "cancelled" => ActionType::Cancelled,
            _ => {
                return Err(PaymentError::ValidationError(
                    "unknown payment status".to_string(),
                ));
            }
        };

        let old_data = json!({ "status": old_status });
        let new_data = json!({ "status": new_status });
        self.record_action(
            EntityType::Payment,
            payment_id,
            action,
            user_id,
            Some(&old_data),
            Some(&new_data),
        )
        .await
    }

    pub async fn get_audit_entry(&self, id: &AuditId) -> Result<AuditEntry> {
        self.store.find_by_id(id).await
    }

    pub async fn get_audit_history(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>> {
        self.store.find_by_entity_id(entity_type, entity_id).await
    }

    pub async fn get_audits_by_filter(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        self.store.find_by_filter(filter).await
    }
}
