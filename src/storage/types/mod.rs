/*!
 * Storage Types
 * Shared types for storage operations
 */

mod errors;
mod file_info;
mod file_mode;
mod options;

pub use errors::{StorageError, StorageResult};
pub use file_info::FileInfo;
pub use file_mode::{FileMode, SyncMode};
pub use options::{ContainerOptions, FileOptions};
