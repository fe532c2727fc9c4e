//! Name-keyed payload storage for the Tome catalog.
//!
//! This crate stores the document files (EPUB/PDF payloads) behind the
//! catalog. Unlike a content-addressed store, payloads are filed under a
//! human-chosen logical name, and a name resolves to at most one live
//! payload: storing under an occupied name replaces the previous payload
//! rather than versioning it.
//!
//! # Key Types
//!
//! - [`BlobStore`] — the storage trait all backends implement
//! - [`BlobObject`] — a stored payload plus its metadata
//! - [`ByteSource`] — resolved payload input (bytes, directory, missing)
//! - [`MemoryBlobStore`] — `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] — durable file-per-payload store with CRC sidecars
//!
//! # Design Rules
//!
//! 1. At most one live object per logical name after any successful `put`.
//! 2. Validate the source before touching stored state: a bad source never
//!    costs the caller the previously stored payload.
//! 3. Superseded and deleted objects stop resolving by ID.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod object;
pub mod source;
pub mod traits;

pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use object::BlobObject;
pub use source::ByteSource;
pub use traits::BlobStore;
