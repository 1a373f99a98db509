//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod memory_audit_adapter;
pub mod tracing_audit_adapter;
