use std::collections::HashMap;
use std::sync::RwLock;

use tome_types::BlobId;

use crate::error::{BlobError, BlobResult};
use crate::names::validate_logical_name;
use crate::object::BlobObject;
use crate::source::ByteSource;
use crate::traits::BlobStore;

/// Index state: both maps are updated together under one lock so a name
/// always resolves to an object that actually exists.
#[derive(Default)]
struct Inner {
    objects: HashMap<BlobId, BlobObject>,
    by_name: HashMap<String, BlobId>,
}

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All payloads are held in memory behind
/// a `RwLock`; objects are cloned on read (cheaply, since the payload is a
/// shared `Bytes`).
pub struct MemoryBlobStore {
    inner: RwLock<Inner>,
}

impl MemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of live objects currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").objects.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").objects.is_empty()
    }

    /// Total payload bytes across all live objects.
    pub fn total_bytes(&self) -> u64 {
        self.inner
            .read()
            .expect("lock poisoned")
            .objects
            .values()
            .map(|obj| obj.size)
            .sum()
    }

    /// Remove all objects from the store.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.objects.clear();
        inner.by_name.clear();
    }

    /// Return a sorted list of all live logical names.
    pub fn all_names(&self) -> Vec<String> {
        let inner = self.inner.read().expect("lock poisoned");
        let mut names: Vec<String> = inner.by_name.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(
        &self,
        logical_name: &str,
        content_type: &str,
        source: ByteSource,
    ) -> BlobResult<BlobId> {
        validate_logical_name(logical_name)?;
        // Pre-flight source check: on failure the object currently filed
        // under this name is untouched.
        let data = source.into_bytes(logical_name)?;

        let object = BlobObject::new(logical_name, content_type, data);
        let id = object.id;

        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(old_id) = inner.by_name.remove(logical_name) {
            inner.objects.remove(&old_id);
        }
        inner.by_name.insert(logical_name.to_string(), id);
        inner.objects.insert(id, object);
        Ok(id)
    }

    fn get(&self, id: &BlobId) -> BlobResult<BlobObject> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .objects
            .get(id)
            .cloned()
            .ok_or(BlobError::NotFound(*id))
    }

    fn latest_by_name(&self, logical_name: &str) -> BlobResult<BlobObject> {
        let inner = self.inner.read().expect("lock poisoned");
        let id = inner
            .by_name
            .get(logical_name)
            .ok_or_else(|| BlobError::NameNotFound(logical_name.to_string()))?;
        inner
            .objects
            .get(id)
            .cloned()
            .ok_or(BlobError::NotFound(*id))
    }

    fn exists_by_name(&self, logical_name: &str) -> BlobResult<bool> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.by_name.contains_key(logical_name))
    }

    fn delete(&self, id: &BlobId) -> BlobResult<bool> {
        let mut inner = self.inner.write().expect("lock poisoned");
        match inner.objects.remove(id) {
            Some(object) => {
                inner.by_name.remove(&object.logical_name);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for MemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("MemoryBlobStore")
            .field("object_count", &count)
            .finish()
    }
}
