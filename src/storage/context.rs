/*!
 * Storage Context
 * Caller-supplied execution context carried by creating/opening operations
 */

use std::time::{Duration, Instant};

use crate::monitoring::generate_trace_id;

/// Execution context for storage operations
///
/// The in-memory backend completes synchronously and only records the trace
/// id in its spans. Backends that block on disk or network should honour
/// the deadline.
#[derive(Debug, Clone)]
pub struct StorageContext {
    trace_id: String,
    deadline: Option<Instant>,
}

impl StorageContext {
    /// Fresh context with a generated trace id and no deadline
    pub fn new() -> Self {
        Self {
            trace_id: generate_trace_id(),
            deadline: None,
        }
    }

    /// Context correlated with an existing trace
    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            deadline: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    #[inline]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline, if any, has passed
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for StorageContext {
    fn default() -> Self {
        Self::new()
    }
}
