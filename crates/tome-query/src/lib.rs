//! Paginated, faceted search over Tome catalog records.
//!
//! The engine is deliberately storage-blind: [`run_query`] takes any
//! snapshot of records in stable order, applies at most one field
//! predicate plus a document-type facet, counts the filtered set, and
//! only then slices the requested page. `total_count` therefore always
//! describes the whole match set, whichever page was asked for.
//!
//! # Key Types
//!
//! - [`QueryFilter`] — one optional [`FieldPredicate`] plus a [`TypeFacet`]
//! - [`SearchField`] — the ten searchable record fields
//! - [`PageRequest`] / [`Page`] — 1-based page geometry and results
//! - [`run_query`] — the staged filter → count → slice pipeline
//!
//! Empty results and past-the-end pages are well-formed pages, never
//! errors; only zero page geometry is rejected.

pub mod engine;
pub mod error;
pub mod filter;
pub mod page;

pub use engine::run_query;
pub use error::{QueryError, QueryResult};
pub use filter::{FieldPredicate, QueryFilter, SearchField, TypeFacet};
pub use page::{Page, PageRequest};
