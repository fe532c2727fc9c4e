use tome_types::{BlobId, BookDraft, BookRecord, RecordId};

use crate::error::CatalogResult;
use crate::update::{FieldUpdate, ListField};

/// Schema-enforcing repository of book records.
///
/// Implementations must uphold:
/// - every insert and every targeted update is validated against the book
///   schema before commit; a rejected write reports the full violation list
///   and leaves the stored record untouched
/// - record IDs are assigned by the repository, never chosen by callers
/// - `list` returns records in stable insertion order, and that order is
///   what pagination downstream iterates over
/// - deleting an absent record is not an error; it reports `false`
pub trait Catalog: Send + Sync {
    /// Ensure the record collection exists and is usable. Safe to call
    /// repeatedly.
    fn initialize(&self) -> CatalogResult<()>;

    /// Validate a draft and persist it as a new record.
    ///
    /// `blob_id` must reference a payload that has already been stored;
    /// a record never exists ahead of its file.
    fn insert(&self, draft: BookDraft, blob_id: BlobId) -> CatalogResult<BookRecord>;

    /// Fetch one record by ID.
    fn find_by_id(&self, id: &RecordId) -> CatalogResult<BookRecord>;

    /// Replace one scalar field, re-validating the whole record before
    /// commit. Returns the updated record.
    fn update_field(&self, id: &RecordId, update: FieldUpdate) -> CatalogResult<BookRecord>;

    /// Append values to one of the list fields. Returns the updated record.
    fn append_to_list(
        &self,
        id: &RecordId,
        field: ListField,
        values: Vec<String>,
    ) -> CatalogResult<BookRecord>;

    /// Remove every occurrence of `value` (matched exactly) from one of the
    /// list fields. Removing a value that is not present is a no-op success.
    fn remove_from_list(
        &self,
        id: &RecordId,
        field: ListField,
        value: &str,
    ) -> CatalogResult<BookRecord>;

    /// Delete a record. Returns `true` if it existed, `false` otherwise.
    fn delete(&self, id: &RecordId) -> CatalogResult<bool>;

    /// Number of records currently stored.
    fn count(&self) -> CatalogResult<usize>;

    /// Every record, in insertion order.
    fn list(&self) -> CatalogResult<Vec<BookRecord>>;
}
