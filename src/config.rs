/*!
 * Storage Configuration
 *
 * Runtime configuration for roots, file options and tracing output
 */

use tracing::warn;

use crate::storage::SyncMode;

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Default read-only policy for containers a root constructs
    pub read_only: bool,
    /// Close-time sync mode used when opening recording files
    pub sync_mode: SyncMode,
    /// Emit JSON logs instead of compact human output
    pub trace_json: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            sync_mode: SyncMode::Sync,
            trace_json: false,
        }
    }
}

impl StorageConfig {
    /// Configuration for replaying existing data without modification
    pub const fn read_only() -> Self {
        Self {
            read_only: true,
            sync_mode: SyncMode::Sync,
            trace_json: false,
        }
    }

    /// Configuration for scratch recordings that need no durability
    pub const fn scratch() -> Self {
        Self {
            read_only: false,
            sync_mode: SyncMode::NoSync,
            trace_json: false,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - STORAGE_READ_ONLY: `1`/`true` to make roots read-only
    /// - STORAGE_SYNC_MODE: `sync` or `nosync`
    /// - STORAGE_TRACE_JSON: `1`/`true` for JSON logs
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sync_mode = match lookup("STORAGE_SYNC_MODE") {
            Some(raw) => raw.parse::<SyncMode>().unwrap_or_else(|e: String| {
                warn!(error = %e, "Ignoring STORAGE_SYNC_MODE");
                defaults.sync_mode
            }),
            None => defaults.sync_mode,
        };

        Self {
            read_only: lookup("STORAGE_READ_ONLY")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.read_only),
            sync_mode,
            trace_json: lookup("STORAGE_TRACE_JSON")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.trace_json),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True")
}
