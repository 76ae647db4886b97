//! Domain model: the payment state machine, audit entries, the store ports
//! and the thin services orchestrating them.

pub mod audit;
pub mod audit_service;
pub mod payment;
pub mod payment_service;
pub mod ports;
