/*!
 * In-Memory Storage Backend
 * Reference implementation of the storage contract, used for testing
 */

mod builder;
mod container;
mod file;
mod file_handle;

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::context::StorageContext;
use super::traits::{Container, ContainerFactory, FileSystem};
use super::types::*;
use crate::config::StorageConfig;

pub use builder::{MemFileBuilder, MemFsBuilder};
pub use container::MemContainer;
pub use file::MemFile;

/// In-memory storage root
///
/// Only the container map is shared at this level; each container and file
/// synchronizes on its own lock. With a factory override configured, creation
/// is handed to the factory and the map is left untouched.
pub struct MemFS {
    containers: DashMap<String, Arc<MemContainer>, RandomState>,
    read_only: bool,
    factory: Option<Arc<dyn ContainerFactory>>,
}

impl MemFS {
    /// Writable root with default container construction
    pub fn new() -> Self {
        MemFsBuilder::new().build()
    }

    pub fn builder() -> MemFsBuilder {
        MemFsBuilder::new()
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        MemFsBuilder::from_config(config).build()
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Typed access to a container constructed by this root
    pub fn mem_container(&self, name: &str) -> Option<Arc<MemContainer>> {
        self.containers.get(name).map(|e| e.value().clone())
    }

    /// Names of registered containers, sorted
    pub fn container_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.containers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl FileSystem for MemFS {
    #[instrument(level = "debug", skip(self, ctx), fields(trace_id = %ctx.trace_id()))]
    fn new_container(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn Container>> {
        if let Some(factory) = &self.factory {
            debug!(container = %name, "container creation delegated to factory");
            return factory.create(ctx, name);
        }

        // The entry holds the shard lock, making check-and-register atomic
        match self.containers.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(format!(
                "container {} already exists",
                name
            ))),
            Entry::Vacant(slot) => {
                let container = Arc::new(MemContainer::new(name, self.read_only));
                slot.insert(container.clone());
                debug!(container = %name, read_only = self.read_only, "container created");
                Ok(container)
            }
        }
    }

    #[instrument(level = "debug", skip(self, ctx), fields(trace_id = %ctx.trace_id()))]
    fn open_container(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn Container>> {
        self.containers
            .get(name)
            .map(|e| e.value().clone() as Arc<dyn Container>)
            .ok_or_else(|| StorageError::NotFound(format!("container {} not found", name)))
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemFS")
            .field("containers", &self.containers.len())
            .field("read_only", &self.read_only)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}
