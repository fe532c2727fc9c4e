//! Schema-enforced book record repository for the Tome catalog.
//!
//! Records follow one declared shape ([`BOOK_SCHEMA`]); every insert and
//! every targeted update is validated against it before anything is
//! committed, and a rejection reports the complete list of offending
//! fields. Edits are field-targeted ([`FieldUpdate`], [`ListField`]) rather
//! than whole-record replacement, so concurrent callers cannot clobber
//! fields they never meant to touch.
//!
//! # Key Types
//!
//! - [`Catalog`] — the repository trait both backends implement
//! - [`BOOK_SCHEMA`] — the declarative record shape, one entry per field
//! - [`FieldUpdate`] / [`ListField`] — targeted scalar and list edits
//! - [`MemoryCatalog`] — map-backed repository for tests and embedding
//! - [`FsCatalog`] — durable document-per-record repository
//!
//! The repository stores metadata only: payload bytes live in the blob
//! store, and a record always carries the `BlobId` of an already-stored
//! payload.

pub mod error;
pub mod fs;
pub mod memory;
pub mod schema;
pub mod traits;
pub mod update;

pub use error::{CatalogError, CatalogResult};
pub use fs::FsCatalog;
pub use memory::MemoryCatalog;
pub use schema::{validate_draft, FieldRequirement, FieldSpec, Violation, BOOK_SCHEMA};
pub use traits::Catalog;
pub use update::{FieldUpdate, ListField};
