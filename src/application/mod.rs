//! Application layer coupling payment lifecycle changes to the audit trail.
//!
//! `PaymentApplicationService` sequences a payment domain operation with the
//! matching audit recording and reports partial failures to the caller.

pub mod service;
