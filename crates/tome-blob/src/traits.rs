use tome_types::BlobId;

use crate::error::BlobResult;
use crate::object::BlobObject;
use crate::source::ByteSource;

/// Name-keyed payload store.
///
/// All implementations must satisfy these invariants:
/// - At most one live object per logical name: a successful `put` removes
///   the object previously stored under that name before inserting the new
///   one.
/// - Source validation precedes mutation: a `put` with a bad source
///   (directory, missing file, empty payload) fails without touching the
///   object already stored under that name.
/// - Between the removal and the insertion of a replacement there is a
///   window with no live object under the name; callers that need a
///   stronger guarantee must serialize their own access.
/// - Superseded and deleted objects stop resolving by ID.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Store a payload under a logical name, replacing any previous payload
    /// filed under that name. Returns the ID of the newly stored object.
    fn put(
        &self,
        logical_name: &str,
        content_type: &str,
        source: ByteSource,
    ) -> BlobResult<BlobId>;

    /// Read an object by ID.
    ///
    /// Fails with `NotFound` when no live object has the ID — including
    /// objects superseded by a same-name replacement.
    fn get(&self, id: &BlobId) -> BlobResult<BlobObject>;

    /// Read the live object filed under a logical name.
    ///
    /// Fails with `NameNotFound` when nothing is stored under it.
    fn latest_by_name(&self, logical_name: &str) -> BlobResult<BlobObject>;

    /// Check whether a live object exists under a logical name.
    fn exists_by_name(&self, logical_name: &str) -> BlobResult<bool>;

    /// Delete an object by ID. Returns `true` if the object existed;
    /// deleting an absent ID is not an error.
    fn delete(&self, id: &BlobId) -> BlobResult<bool>;
}
