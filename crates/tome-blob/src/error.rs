use std::path::PathBuf;

use tome_types::BlobId;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// No stored payload has the requested ID (it may have been superseded
    /// by a same-name replacement or deleted).
    #[error("blob not found: {0}")]
    NotFound(BlobId),

    /// No live payload is stored under the requested logical name.
    #[error("no blob stored under name: {0}")]
    NameNotFound(String),

    /// The source path names a directory, not a file.
    #[error("source is a directory, not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The source path does not exist.
    #[error("source file does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Refused to store an empty payload.
    #[error("refusing to store empty payload under name: {0}")]
    EmptyPayload(String),

    /// The logical name is unusable as a storage key.
    #[error("invalid logical name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Stored payload failed its integrity check on read.
    #[error("corrupt blob {id}: {reason}")]
    CorruptBlob { id: BlobId, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;
