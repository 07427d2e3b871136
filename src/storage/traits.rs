/*!
 * Storage Traits
 * Contract every storage backend (memory, disk, object store) must satisfy
 */

use std::sync::Arc;

use super::context::StorageContext;
use super::types::*;

/// Storage root
///
/// Namespace of top-level containers. Container names are unique per root.
pub trait FileSystem: Send + Sync {
    /// Create and register a new container
    fn new_container(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn Container>>;

    /// Open a registered container; returns the shared handle, not a copy
    fn open_container(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn Container>>;
}

/// Namespace of files and sub-containers with an open/closed lifecycle
///
/// Files and sub-containers share one child namespace. Names are never
/// rebound and nothing succeeds once the container is closed.
pub trait Container: Send + Sync {
    fn name(&self) -> &str;

    /// Close the container; a second close fails with `AlreadyClosed`
    fn close(&self) -> StorageResult<()>;

    /// Create an empty append-mode file
    fn create(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn File>>;

    /// Create a file with explicit options
    fn open_file(
        &self,
        ctx: &StorageContext,
        name: &str,
        options: FileOptions,
    ) -> StorageResult<Arc<dyn File>>;

    /// Create an empty child container
    fn sub_container(
        &self,
        ctx: &StorageContext,
        name: &str,
        options: ContainerOptions,
    ) -> StorageResult<Arc<dyn Container>>;

    fn is_closed(&self) -> bool;
}

/// Append-oriented byte object with an open/closed lifecycle
pub trait File: Send + Sync {
    fn name(&self) -> &str;

    fn stat(&self) -> StorageResult<FileInfo>;

    /// Copy unread bytes into `buf`; `Ok(0)` signals end of data
    fn read(&self, buf: &mut [u8]) -> StorageResult<usize>;

    /// Append `data`; a failed write leaves the content unchanged
    fn write(&self, data: &[u8]) -> StorageResult<usize>;

    fn write_str(&self, s: &str) -> StorageResult<usize> {
        self.write(s.as_bytes())
    }

    fn close(&self) -> StorageResult<()>;
}

/// Factory substituted for the default container constructor of a root
pub trait ContainerFactory: Send + Sync {
    fn create(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn Container>>;
}

impl<F> ContainerFactory for F
where
    F: Fn(&StorageContext, &str) -> StorageResult<Arc<dyn Container>> + Send + Sync,
{
    fn create(&self, ctx: &StorageContext, name: &str) -> StorageResult<Arc<dyn Container>> {
        self(ctx, name)
    }
}

/// Replaces the default `File::stat` behavior
pub trait StatHook: Send + Sync {
    fn stat(&self, name: &str) -> StorageResult<FileInfo>;
}

impl<F> StatHook for F
where
    F: Fn(&str) -> StorageResult<FileInfo> + Send + Sync,
{
    fn stat(&self, name: &str) -> StorageResult<FileInfo> {
        self(name)
    }
}

/// Replaces the default `File::close` behavior
///
/// The file is marked closed only when the hook returns `Ok`.
pub trait CloseHook: Send + Sync {
    fn close(&self, name: &str) -> StorageResult<()>;
}

impl<F> CloseHook for F
where
    F: Fn(&str) -> StorageResult<()> + Send + Sync,
{
    fn close(&self, name: &str) -> StorageResult<()> {
        self(name)
    }
}
