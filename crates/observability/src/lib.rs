//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide tracing with the default configuration.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&tracing::TracingConfig::default());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, TracingConfig, init_with};
