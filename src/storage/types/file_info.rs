/*!
 * File Info
 * Metadata returned by `File::stat`
 */

use super::file_mode::FileMode;
use crate::core::serde::{is_zero_u64, system_time_micros};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Snapshot of a file's metadata
///
/// `modified` is serialized as microseconds since the UNIX epoch. A file
/// that was never written reports the epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileInfo {
    pub name: String,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub size: u64,
    #[serde(default)]
    pub mode: FileMode,
    #[serde(with = "system_time_micros")]
    pub modified: SystemTime,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64, mode: FileMode, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            size,
            mode,
            modified,
        }
    }

    /// Files are always leaves
    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        false
    }
}
