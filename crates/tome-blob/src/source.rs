use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{BlobError, BlobResult};

/// Resolved outcome of reading a payload source.
///
/// Filesystem resolution happens up front in [`ByteSource::from_path`]; the
/// two interesting failure shapes (directory, nonexistent path) are captured
/// as variants rather than errors so a store can report them without having
/// touched any of its own state. A `put` with a bad source must never cost
/// the caller the payload already stored under that name.
#[derive(Clone, Debug)]
pub enum ByteSource {
    /// Payload bytes, with the path they came from when read off disk.
    Bytes {
        data: Bytes,
        origin: Option<PathBuf>,
    },
    /// The path names a directory.
    Directory(PathBuf),
    /// The path does not exist.
    Missing(PathBuf),
}

impl ByteSource {
    /// Wrap in-memory bytes with no filesystem origin.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Bytes {
            data: data.into(),
            origin: None,
        }
    }

    /// Resolve a filesystem path into a source.
    ///
    /// A directory or a nonexistent path becomes the corresponding variant;
    /// other I/O failures (permissions, hardware) are returned as errors.
    pub fn from_path(path: impl AsRef<Path>) -> BlobResult<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        match fs::read(path) {
            Ok(data) => Ok(Self::Bytes {
                data: data.into(),
                origin: Some(path.to_path_buf()),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Self::Missing(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate the source and unwrap its payload bytes.
    ///
    /// This is the pre-flight check every `put` runs before mutating any
    /// stored state: directory and missing sources fail with their typed
    /// errors, as does an empty payload.
    pub fn into_bytes(self, logical_name: &str) -> BlobResult<Bytes> {
        match self {
            Self::Bytes { data, .. } => {
                if data.is_empty() {
                    Err(BlobError::EmptyPayload(logical_name.to_string()))
                } else {
                    Ok(data)
                }
            }
            Self::Directory(path) => Err(BlobError::NotAFile(path)),
            Self::Missing(path) => Err(BlobError::SourceMissing(path)),
        }
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl From<Bytes> for ByteSource {
    fn from(data: Bytes) -> Self {
        Self::from_bytes(data)
    }
}
