/*!
 * In-Memory Builders
 * Builder pattern for MemFS and standalone MemFile construction
 */

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;

use super::super::traits::{CloseHook, ContainerFactory, StatHook};
use super::super::types::FileMode;
use super::file::MemFile;
use super::MemFS;
use crate::config::StorageConfig;

/// Builder for MemFS
#[derive(Default)]
pub struct MemFsBuilder {
    read_only: bool,
    factory: Option<Arc<dyn ContainerFactory>>,
}

impl MemFsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from runtime configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            read_only: config.read_only,
            factory: None,
        }
    }

    /// Containers constructed by the root (and their files) reject writes
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Hand container creation to `factory`
    ///
    /// The root neither checks nor registers names the factory handles.
    pub fn with_container_factory(mut self, factory: impl ContainerFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn build(self) -> MemFS {
        MemFS {
            containers: DashMap::with_hasher(RandomState::new()),
            read_only: self.read_only,
            factory: self.factory,
        }
    }
}

/// Builder for standalone MemFile instances
pub struct MemFileBuilder {
    name: String,
    mode: FileMode,
    read_only: bool,
    stat_hook: Option<Arc<dyn StatHook>>,
    close_hook: Option<Arc<dyn CloseHook>>,
}

impl MemFileBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: FileMode::append(),
            read_only: false,
            stat_hook: None,
            close_hook: None,
        }
    }

    pub fn mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn stat_hook(mut self, hook: impl StatHook + 'static) -> Self {
        self.stat_hook = Some(Arc::new(hook));
        self
    }

    pub fn close_hook(mut self, hook: impl CloseHook + 'static) -> Self {
        self.close_hook = Some(Arc::new(hook));
        self
    }

    pub(super) fn hooks(
        mut self,
        stat_hook: Option<Arc<dyn StatHook>>,
        close_hook: Option<Arc<dyn CloseHook>>,
    ) -> Self {
        self.stat_hook = stat_hook;
        self.close_hook = close_hook;
        self
    }

    pub fn build(self) -> MemFile {
        MemFile::from_parts(
            self.name,
            self.mode,
            self.read_only,
            self.stat_hook,
            self.close_hook,
        )
    }
}
