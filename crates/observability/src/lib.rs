//! Tracing/logging setup shared by rolegate binaries.

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use self::tracing::{LogFormat, init};
