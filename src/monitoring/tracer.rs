/*!
 * Tracing Setup
 * Structured logging for storage operations using the tracing crate
 *
 * Features:
 * - Trace ID generation for request correlation
 * - JSON-formatted logs for structured parsing
 * - Compact human-readable output for development
 */

use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

use crate::config::StorageConfig;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - STORAGE_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    init_tracing_with(&StorageConfig::from_env());
}

/// Initialize structured tracing from an explicit configuration
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing_with(config: &StorageConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.trace_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        info!(json = config.trace_json, "Structured tracing initialized");
    }
}

/// Generate a unique trace ID for request correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}
