/*!
 * File Mode and Sync Mode
 * Classification flags fixed when a file is created
 */

use crate::core::serde::is_false;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File mode flags with compact serialization (only true flags are written)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct FileMode {
    #[serde(skip_serializing_if = "is_false")]
    pub append: bool,
    /// No durability guarantee; a disk backend would skip fsync on close
    #[serde(skip_serializing_if = "is_false")]
    pub temporary: bool,
}

impl FileMode {
    /// Append-only mode used for every container-created file
    #[inline]
    #[must_use]
    pub const fn append() -> Self {
        Self {
            append: true,
            temporary: false,
        }
    }

    /// Append mode without durability guarantee
    #[inline]
    #[must_use]
    pub const fn append_temporary() -> Self {
        Self {
            append: true,
            temporary: true,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_append(&self) -> bool {
        self.append
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.temporary
    }
}

impl From<SyncMode> for FileMode {
    fn from(mode: SyncMode) -> Self {
        match mode {
            SyncMode::Sync => FileMode::append(),
            SyncMode::NoSync => FileMode::append_temporary(),
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let a = if self.append { 'a' } else { '-' };
        let t = if self.temporary { 'T' } else { '-' };
        write!(f, "{}{}", a, t)
    }
}

/// Close-time durability mode requested when opening a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    #[default]
    Sync,
    #[serde(rename = "nosync")]
    NoSync,
}

impl std::str::FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(SyncMode::Sync),
            "nosync" | "no_sync" | "no-sync" => Ok(SyncMode::NoSync),
            other => Err(format!("unknown sync mode: {}", other)),
        }
    }
}
