/*!
 * In-Memory Container
 * Namespace of files and sub-containers guarded by its own lock
 */

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::super::context::StorageContext;
use super::super::traits::{Container, File};
use super::super::types::*;
use super::file::MemFile;

#[derive(Default)]
struct ContainerState {
    closed: bool,
    files: HashMap<String, Arc<MemFile>, RandomState>,
    subs: HashMap<String, Arc<MemContainer>, RandomState>,
}

impl ContainerState {
    /// Files and sub-containers share one namespace
    fn is_taken(&self, name: &str) -> bool {
        self.files.contains_key(name) || self.subs.contains_key(name)
    }
}

/// In-memory container
///
/// Every check-then-act sequence (closed check, name check, registration)
/// runs under the container's exclusive lock. Children have their own locks
/// and are never locked while this one is held.
pub struct MemContainer {
    name: String,
    read_only: bool,
    state: RwLock<ContainerState>,
}

impl MemContainer {
    pub fn new(name: impl Into<String>, read_only: bool) -> Self {
        Self {
            name: name.into(),
            read_only,
            state: RwLock::new(ContainerState::default()),
        }
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Typed access to a file created in this container
    pub fn mem_file(&self, name: &str) -> Option<Arc<MemFile>> {
        self.state.read().files.get(name).cloned()
    }

    /// Typed access to a sub-container created in this container
    pub fn mem_sub_container(&self, name: &str) -> Option<Arc<MemContainer>> {
        self.state.read().subs.get(name).cloned()
    }

    /// Names of all children, sorted
    pub fn child_names(&self) -> Vec<String> {
        let state = self.state.read();
        let mut names: Vec<String> = state
            .files
            .keys()
            .chain(state.subs.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn check_vacant(&self, state: &ContainerState, name: &str, op: &str) -> StorageResult<()> {
        if state.closed {
            return Err(StorageError::Closed(format!(
                "{} {} on closed container {}",
                op, name, self.name
            )));
        }
        if state.is_taken(name) {
            return Err(StorageError::AlreadyExists(format!(
                "{} already exists in container {}",
                name, self.name
            )));
        }
        Ok(())
    }

    fn register_file(
        &self,
        ctx: &StorageContext,
        name: &str,
        options: FileOptions,
    ) -> StorageResult<Arc<MemFile>> {
        let mut state = self.state.write();
        self.check_vacant(&state, name, "create file")?;

        let file = Arc::new(
            MemFile::builder(name)
                .mode(options.close_sync_mode.into())
                .read_only(self.read_only)
                .hooks(options.stat_hook, options.close_hook)
                .build(),
        );
        state.files.insert(name.to_string(), file.clone());

        debug!(
            container = %self.name,
            file = %name,
            mode = %file.mode(),
            read_only = self.read_only,
            trace_id = %ctx.trace_id(),
            "file created"
        );
        Ok(file)
    }
}

impl Container for MemContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn close(&self) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.closed {
            return Err(StorageError::AlreadyClosed(format!(
                "close on closed container {}",
                self.name
            )));
        }
        state.closed = true;
        debug!(container = %self.name, "container closed");
        Ok(())
    }

    fn create(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn File>> {
        let file: Arc<dyn File> = self.register_file(ctx, name, FileOptions::default())?;
        Ok(file)
    }

    fn open_file(
        &self,
        ctx: &StorageContext,
        name: &str,
        options: FileOptions,
    ) -> StorageResult<Arc<dyn File>> {
        let file: Arc<dyn File> = self.register_file(ctx, name, options)?;
        Ok(file)
    }

    fn sub_container(
        &self,
        ctx: &StorageContext,
        name: &str,
        options: ContainerOptions,
    ) -> StorageResult<Arc<dyn Container>> {
        let mut state = self.state.write();
        self.check_vacant(&state, name, "sub-container")?;

        let read_only = options.read_only.unwrap_or(false);
        let child = Arc::new(MemContainer::new(name, read_only));
        state.subs.insert(name.to_string(), child.clone());

        debug!(
            container = %self.name,
            sub_container = %name,
            read_only,
            trace_id = %ctx.trace_id(),
            "sub-container created"
        );
        Ok(child)
    }

    fn is_closed(&self) -> bool {
        self.state.read().closed
    }
}

impl fmt::Debug for MemContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemContainer")
            .field("name", &self.name)
            .field("read_only", &self.read_only)
            .field("closed", &state.closed)
            .field("files", &state.files.len())
            .field("subs", &state.subs.len())
            .finish()
    }
}
