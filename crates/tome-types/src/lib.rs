//! Foundation types for the Tome catalog manager.
//!
//! This crate provides the identifier, file-type, and record types used
//! throughout the Tome system. Every other Tome crate depends on
//! `tome-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] — UUID v7 identifier for a catalog record
//! - [`BlobId`] — UUID v7 identifier for a stored payload
//! - [`FileType`] — Recognized document format (EPUB or PDF)
//! - [`Author`] — Author entry with an optional pseudonym
//! - [`BookDraft`] — Caller-supplied record shape, pre-validation
//! - [`BookRecord`] — Persisted catalog record with assigned identifiers

pub mod book;
pub mod error;
pub mod file_type;
pub mod id;

pub use book::{Author, BookDraft, BookRecord};
pub use error::TypeError;
pub use file_type::FileType;
pub use id::{BlobId, RecordId};
