//! Storage error handling
//!
//! Typed errors for the session file, each with a hint the CLI can show
//! next to the message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Direction of the failed file operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Read,
    Write,
}

/// Errors from reading or writing the session file
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Disk full while writing '{path}'. Free up disk space and try again.")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File content is not a valid token
    #[error("Invalid session file '{path}': {details}")]
    InvalidFormat { path: PathBuf, details: String },

    /// The temp file couldn't replace the session file
    #[error("Could not replace '{to}' with '{from}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an I/O error for `path`
    pub fn from_io(error: io::Error, path: PathBuf, op: FileOp) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            return StorageError::PermissionDenied {
                path,
                source: error,
            };
        }

        match op {
            FileOp::Write if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            FileOp::Write => StorageError::WriteError {
                path,
                source: error,
            },
            FileOp::Read => StorageError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Check if the user can fix this without losing the session
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::DiskFull { .. } | StorageError::PermissionDenied { .. }
        )
    }

    /// What the user can do about it
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Check that you own the data directory and can write to it.")
            }
            StorageError::InvalidFormat { .. } => {
                Some("Delete the session file and log in again.")
            }
            StorageError::CreateDirectory { .. } => {
                Some("Set data_dir to a writable location with `irlquest config set data_dir <path>`.")
            }
            _ => None,
        }
    }
}

fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
