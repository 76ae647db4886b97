//! CSV adapters used by the command-line driver.

pub mod audit_writer;
pub mod command_reader;
