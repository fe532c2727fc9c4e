use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use tome_types::BlobId;

/// A stored payload together with its identifying metadata.
///
/// Cloning is cheap: the payload is a reference-counted [`Bytes`].
#[derive(Clone, PartialEq, Eq)]
pub struct BlobObject {
    /// Assigned at store time; unique per stored payload.
    pub id: BlobId,
    /// Human-chosen name this payload is filed under
    /// (e.g. `"Frankenstein.epub"`).
    pub logical_name: String,
    /// MIME label recorded at store time.
    pub content_type: String,
    /// When this payload was stored.
    pub uploaded_at: DateTime<Utc>,
    /// Payload length in bytes.
    pub size: u64,
    /// The payload itself.
    pub data: Bytes,
}

impl BlobObject {
    /// Assemble a freshly-identified object around payload bytes.
    pub fn new(
        logical_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        let size = data.len() as u64;
        Self {
            id: BlobId::new(),
            logical_name: logical_name.into(),
            content_type: content_type.into(),
            uploaded_at: Utc::now(),
            size,
            data,
        }
    }
}

impl fmt::Debug for BlobObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payload bytes are elided; only their length is shown.
        f.debug_struct("BlobObject")
            .field("id", &self.id)
            .field("logical_name", &self.logical_name)
            .field("content_type", &self.content_type)
            .field("uploaded_at", &self.uploaded_at)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
