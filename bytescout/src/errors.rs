/// This module defines the error types for bytescout.
///
/// Errors fall into two groups:
///
/// 1. **Skippable** errors concern a single directory or file. The component
///    that hits one reports it and moves on to the next item:
///    ```rust,ignore
///    match scanner.scan(&path) {
///        Ok(true) => report(&path),
///        Ok(false) => {}
///        Err(e) if !e.is_fatal() => warn!("{}", e),
///        Err(e) => return Err(e),
///    }
///    ```
///
/// 2. **Fatal** errors mean the process ran out of memory while growing the
///    worklist, building a path, or allocating a read buffer. They end the
///    whole walk.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while walking a tree or scanning a file
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Error opening directory: {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error opening file: {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error reading file: {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid byte format: {0}")]
    InvalidPattern(String),
    #[error("Memory allocation failed: {0}")]
    ResourceExhausted(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    pub fn directory_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn file_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_pattern(input: impl Into<String>) -> Self {
        Self::InvalidPattern(input.into())
    }

    pub fn resource_exhausted(what: impl Into<String>) -> Self {
        Self::ResourceExhausted(what.into())
    }

    /// Whether this error ends the whole walk rather than one item
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceExhausted(_))
    }
}
