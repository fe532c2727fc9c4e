//! High-level API for the Tome catalog.
//!
//! [`Library`] wires the payload store, the record repository, and the
//! query engine behind one handle. This is the entry point for anything
//! embedding Tome, and what the `tome` binary drives.
//!
//! # Key Types
//!
//! - [`Library`] — add/search/edit/remove books, fetch and export payloads
//! - [`LibraryConfig`] — the `tome.toml` settings
//! - [`SeedBook`] / [`seed`] — the bundled demo catalog
//! - [`LibraryError`] — one error over every subsystem

pub mod config;
pub mod error;
pub mod library;
pub mod seed;

pub use config::LibraryConfig;
pub use error::{LibraryError, LibraryResult};
pub use library::Library;
pub use seed::{sample_books, SeedBook};

// Re-export the types callers handle through the Library API.
pub use tome_blob::{BlobObject, ByteSource};
pub use tome_catalog::{FieldUpdate, ListField, Violation};
pub use tome_query::{Page, PageRequest, QueryFilter, SearchField, TypeFacet};
pub use tome_types::{Author, BookDraft, BookRecord, FileType, RecordId};
