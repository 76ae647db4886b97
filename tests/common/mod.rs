#![allow(dead_code)]

use paytrail::application::service::PaymentApplicationService;
use paytrail::domain::audit_service::AuditService;
use paytrail::domain::payment_service::PaymentService;
use paytrail::infrastructure::in_memory::{InMemoryAuditStore, InMemoryPaymentStore};
use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "op, payment, amount, currency, description, user";

/// Application service wired to fresh in-memory stores.
pub fn in_memory_app() -> PaymentApplicationService {
    PaymentApplicationService::new(
        PaymentService::new(Box::new(InMemoryPaymentStore::new())),
        AuditService::new(Box::new(InMemoryAuditStore::new())),
    )
}

/// Writes a command file with the standard header followed by `rows`.
pub fn command_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}
