/*!
 * In-Memory File
 * Byte buffer with lifecycle, consuming reads and failure injection
 */

use bytes::{Buf, BytesMut};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use super::super::traits::{CloseHook, File, StatHook};
use super::super::types::*;
use super::builder::MemFileBuilder;

/// Mutable part of a file, guarded by the file's own lock
#[derive(Debug)]
struct FileState {
    /// Unread bytes; reads advance past what they return
    data: BytesMut,
    modified: SystemTime,
    closed: bool,
    out_of_space: bool,
}

/// In-memory file
///
/// Reads drain the buffer and, like writes, close and flag changes, take the
/// lock exclusively. Stat and lifecycle queries share it. The close hook runs
/// while the file's lock is held, so it must not call back into the same
/// file.
pub struct MemFile {
    name: String,
    mode: FileMode,
    read_only: bool,
    stat_hook: Option<Arc<dyn StatHook>>,
    close_hook: Option<Arc<dyn CloseHook>>,
    state: RwLock<FileState>,
}

impl MemFile {
    /// Writable file with no hooks
    pub fn new(name: impl Into<String>, mode: FileMode) -> Self {
        Self::builder(name).mode(mode).build()
    }

    /// Standalone file with custom mode, read-only flag and hooks
    pub fn builder(name: impl Into<String>) -> MemFileBuilder {
        MemFileBuilder::new(name)
    }

    pub(super) fn from_parts(
        name: String,
        mode: FileMode,
        read_only: bool,
        stat_hook: Option<Arc<dyn StatHook>>,
        close_hook: Option<Arc<dyn CloseHook>>,
    ) -> Self {
        Self {
            name,
            mode,
            read_only,
            stat_hook,
            close_hook,
            state: RwLock::new(FileState {
                data: BytesMut::new(),
                modified: UNIX_EPOCH,
                closed: false,
                out_of_space: false,
            }),
        }
    }

    #[inline]
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    /// Force every following write to fail with `OutOfSpace`
    pub fn set_out_of_space(&self, out_of_space: bool) {
        self.state.write().out_of_space = out_of_space;
        debug!(file = %self.name, out_of_space, "out-of-space injection changed");
    }

    pub fn is_out_of_space(&self) -> bool {
        self.state.read().out_of_space
    }

    /// Number of unread bytes
    pub fn len(&self) -> usize {
        self.state.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl File for MemFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn stat(&self) -> StorageResult<FileInfo> {
        let info = {
            let state = self.state.read();
            if state.closed {
                return Err(StorageError::Closed(format!("stat on closed file {}", self.name)));
            }
            FileInfo::new(
                self.name.clone(),
                state.data.len() as u64,
                self.mode,
                state.modified,
            )
        };

        match &self.stat_hook {
            Some(hook) => hook.stat(&self.name).inspect_err(|e| {
                warn!(file = %self.name, error = %e, "stat hook failed");
            }),
            None => Ok(info),
        }
    }

    fn read(&self, buf: &mut [u8]) -> StorageResult<usize> {
        let mut state = self.state.write();
        if state.closed {
            return Err(StorageError::Closed(format!("read on closed file {}", self.name)));
        }

        let n = state.data.len().min(buf.len());
        buf[..n].copy_from_slice(&state.data[..n]);
        state.data.advance(n);
        Ok(n)
    }

    fn write(&self, data: &[u8]) -> StorageResult<usize> {
        let mut state = self.state.write();

        if state.closed {
            return Err(StorageError::Closed(format!("write on closed file {}", self.name)));
        }

        if self.read_only {
            warn!(file = %self.name, "write rejected: read-only file");
            return Err(StorageError::ReadOnly(format!("write on read-only file {}", self.name)));
        }

        if state.out_of_space {
            warn!(file = %self.name, bytes = data.len(), "write rejected: out of space");
            return Err(StorageError::OutOfSpace(format!(
                "write to {} failed, no space left on device",
                self.name
            )));
        }

        state.data.extend_from_slice(data);
        state.modified = SystemTime::now();
        Ok(data.len())
    }

    fn close(&self) -> StorageResult<()> {
        let mut state = self.state.write();

        if state.closed {
            return Err(StorageError::AlreadyClosed(format!("close on closed file {}", self.name)));
        }

        if let Some(hook) = &self.close_hook {
            if let Err(e) = hook.close(&self.name) {
                warn!(file = %self.name, error = %e, "close hook failed");
                return Err(e);
            }
        }

        state.closed = true;
        debug!(file = %self.name, size = state.data.len(), "file closed");
        Ok(())
    }
}

impl fmt::Debug for MemFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemFile")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("read_only", &self.read_only)
            .field("size", &state.data.len())
            .field("closed", &state.closed)
            .field("out_of_space", &state.out_of_space)
            .finish()
    }
}
