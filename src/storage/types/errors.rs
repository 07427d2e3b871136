/*!
 * Storage Error Types
 * Structured error taxonomy shared by every storage backend
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use std::io;
use thiserror::Error;

/// Storage operation result
///
/// # Must Use
/// Storage operations can fail and must be handled to prevent data loss
#[must_use = "storage operations can fail and must be handled"]
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
///
/// Every variant carries a non-empty context string naming the object or
/// operation involved. Serialization uses the tagged enum pattern.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum StorageError {
    #[error("Already exists: {0}")]
    #[diagnostic(
        code(storage::already_exists),
        help("Names are never rebound within a namespace. Pick a different name.")
    )]
    AlreadyExists(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not found: {0}")]
    #[diagnostic(
        code(storage::not_found),
        help("Create the container before opening it.")
    )]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Closed: {0}")]
    #[diagnostic(
        code(storage::closed),
        help("The object was closed. Open or create a new one.")
    )]
    Closed(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Already closed: {0}")]
    #[diagnostic(
        code(storage::already_closed),
        help("Close is not idempotent. Track whether the object was already closed.")
    )]
    AlreadyClosed(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Read-only: {0}")]
    #[diagnostic(code(storage::read_only))]
    ReadOnly(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Out of space: {0}")]
    #[diagnostic(
        code(storage::out_of_space),
        help("No bytes were written. The caller decides whether to retry elsewhere.")
    )]
    OutOfSpace(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Hook failed: {0}")]
    #[diagnostic(code(storage::hook))]
    Hook(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl StorageError {
    /// Build a hook failure from any displayable cause
    pub fn hook(cause: impl std::fmt::Display) -> Self {
        StorageError::Hook(cause.to_string())
    }

    /// Map to the closest `io::ErrorKind`
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            StorageError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            StorageError::NotFound(_) => io::ErrorKind::NotFound,
            StorageError::Closed(_) | StorageError::AlreadyClosed(_) => {
                io::ErrorKind::BrokenPipe
            }
            StorageError::ReadOnly(_) => io::ErrorKind::PermissionDenied,
            StorageError::OutOfSpace(_) | StorageError::Hook(_) => io::ErrorKind::Other,
        }
    }
}

impl From<StorageError> for io::Error {
    fn from(err: StorageError) -> Self {
        io::Error::new(err.io_kind(), err)
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
