/*!
 * Session Storage Library
 * Hierarchical container/file storage with failure injection
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod recording;
pub mod storage;

// Re-exports
pub use config::StorageConfig;
pub use monitoring::{generate_trace_id, init_tracing};
pub use recording::{read_frames, RecordingError, SessionRecorder};
pub use storage::{
    Container, ContainerOptions, File, FileInfo, FileMode, FileOptions, FileSystem, MemContainer,
    MemFS, MemFile, StorageContext, StorageError, StorageResult, SyncMode,
};
