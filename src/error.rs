use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    InvalidTransition(String),
    /// The payment mutation was persisted but its audit entry was not.
    #[error("payment {payment_id} was updated but the audit entry was not recorded: {source}")]
    AuditNotRecorded {
        payment_id: String,
        #[source]
        source: Box<PaymentError>,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl PaymentError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_messages_display_verbatim() {
        let err = PaymentError::InvalidTransition("completed payment cannot be failed".into());
        assert_eq!(err.to_string(), "completed payment cannot be failed");

        let err = PaymentError::ValidationError("currency cannot be empty".into());
        assert_eq!(err.to_string(), "currency cannot be empty");
    }

    #[test]
    fn test_audit_not_recorded_keeps_source() {
        let err = PaymentError::AuditNotRecorded {
            payment_id: "p-1".into(),
            source: Box::new(PaymentError::not_found("audit entry", "a-1")),
        };
        assert!(err.to_string().starts_with("payment p-1 was updated"));
        assert!(err.to_string().ends_with("audit entry not found: a-1"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
