/*!
 * Storage Module
 * Hierarchical container/file storage contract and its in-memory backend
 */

pub mod context;
pub mod memory;
pub mod traits;
pub mod types;

// Re-exports
pub use context::StorageContext;
pub use memory::{MemContainer, MemFS, MemFile, MemFileBuilder, MemFsBuilder};
pub use traits::{CloseHook, Container, ContainerFactory, File, FileSystem, StatHook};
pub use types::{
    ContainerOptions, FileInfo, FileMode, FileOptions, StorageError, StorageResult, SyncMode,
};
