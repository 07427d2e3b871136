/*!
 * Open Options
 * Per-call configuration for opening files and sub-containers
 */

use std::fmt;
use std::sync::Arc;

use super::file_mode::SyncMode;
use crate::config::StorageConfig;
use crate::storage::traits::{CloseHook, StatHook};

/// Options accepted by `Container::open_file`
#[derive(Clone, Default)]
pub struct FileOptions {
    pub close_sync_mode: SyncMode,
    pub stat_hook: Option<Arc<dyn StatHook>>,
    pub close_hook: Option<Arc<dyn CloseHook>>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options seeded from the runtime configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            close_sync_mode: config.sync_mode,
            ..Default::default()
        }
    }

    pub fn with_close_sync_mode(mut self, mode: SyncMode) -> Self {
        self.close_sync_mode = mode;
        self
    }

    pub fn with_stat_hook(mut self, hook: impl StatHook + 'static) -> Self {
        self.stat_hook = Some(Arc::new(hook));
        self
    }

    pub fn with_close_hook(mut self, hook: impl CloseHook + 'static) -> Self {
        self.close_hook = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for FileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileOptions")
            .field("close_sync_mode", &self.close_sync_mode)
            .field("stat_hook", &self.stat_hook.is_some())
            .field("close_hook", &self.close_hook.is_some())
            .finish()
    }
}

/// Options accepted by `Container::sub_container`
///
/// Sub-containers do not inherit the parent's read-only flag; `read_only`
/// set to `None` yields a writable child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerOptions {
    pub read_only: Option<bool>,
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }
}
