use crate::domain::audit::{AuditEntry, AuditFilter, AuditId, EntityType};
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{AuditStore, PaymentStore};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing payments.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for storing audit entries.
pub const CF_AUDIT_ENTRIES: &str = "audit_entries";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `Payment` and `AuditEntry` entities using
/// separate Column Families, serialized as JSON. Writes go through a
/// store-wide mutex so the existence checks in `update` and `delete` hold
/// for the duration of the call.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    writes: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_audit = ColumnFamilyDescriptor::new(CF_AUDIT_ENTRIES, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_audit])?;

        Ok(Self {
            db: Arc::new(db),
            writes: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_pinned_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self.db.get_pinned_cf(cf, key)?.is_some())
    }

    fn put_json<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            items.push(serde_json::from_slice(&value)?);
        }
        Ok(items)
    }

    fn scan_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> = self
            .scan::<AuditEntry>(CF_AUDIT_ENTRIES)?
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        entries.sort_by_key(|entry| entry.timestamp());
        Ok(entries)
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn save(&self, payment: Payment) -> Result<()> {
        let _guard = self.writes.lock().await;
        self.put_json(CF_PAYMENTS, payment.id().as_str().as_bytes(), &payment)
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Payment> {
        self.get_json(CF_PAYMENTS, id.as_str().as_bytes())?
            .ok_or_else(|| PaymentError::not_found("payment", id.as_str()))
    }

    async fn find_all(&self) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = self.scan(CF_PAYMENTS)?;
        payments.sort_by_key(|p| p.created_at());
        Ok(payments)
    }

    async fn update(&self, payment: Payment) -> Result<()> {
        let _guard = self.writes.lock().await;
        let key = payment.id().as_str().as_bytes();
        if !self.exists(CF_PAYMENTS, key)? {
            return Err(PaymentError::not_found("payment", payment.id().as_str()));
        }
        self.put_json(CF_PAYMENTS, key, &payment)
    }

    async fn delete(&self, id: &PaymentId) -> Result<()> {
        let _guard = self.writes.lock().await;
        let key = id.as_str().as_bytes();
        if !self.exists(CF_PAYMENTS, key)? {
            return Err(PaymentError::not_found("payment", id.as_str()));
        }
        let cf = self.cf(CF_PAYMENTS)?;
        self.db.delete_cf(cf, key)?;
        Ok(())
    }
}

#[async_trait]
impl AuditStore for RocksDBStore {
    async fn save(&self, entry: AuditEntry) -> Result<()> {
        let _guard = self.writes.lock().await;
        self.put_json(CF_AUDIT_ENTRIES, entry.id().as_str().as_bytes(), &entry)
    }

    async fn find_by_id(&self, id: &AuditId) -> Result<AuditEntry> {
        self.get_json(CF_AUDIT_ENTRIES, id.as_str().as_bytes())?
            .ok_or_else(|| PaymentError::not_found("audit entry", id.as_str()))
    }

    async fn find_by_entity_id(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>> {
        self.scan_audit(
            &AuditFilter::new()
                .with_entity_type(entity_type)
                .with_entity_id(entity_id),
        )
    }

    async fn find_by_filter(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        self.scan_audit(filter)
    }
}
