use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use tome_blob::{BlobObject, BlobStore, ByteSource, FsBlobStore, MemoryBlobStore};
use tome_catalog::{
    validate_draft, Catalog, CatalogError, FieldUpdate, FsCatalog, ListField, MemoryCatalog,
};
use tome_query::{run_query, Page, PageRequest, QueryFilter};
use tome_types::{BookDraft, BookRecord, FileType, RecordId};

use crate::config::LibraryConfig;
use crate::error::LibraryResult;
use crate::seed::{self, SeedBook};

/// High-level catalog API: one handle over the blob store, the record
/// repository, and the query engine.
///
/// A book is always two writes: payload first, record second. `add_book`
/// never inserts a record whose payload is not already stored, and a
/// failed insert claws the stored payload back.
pub struct Library {
    blobs: Arc<dyn BlobStore>,
    catalog: Arc<dyn Catalog>,
    config: LibraryConfig,
}

impl Library {
    /// Fully in-memory library. Nothing touches disk; state dies with the
    /// handle.
    pub fn in_memory() -> Self {
        Self {
            blobs: Arc::new(MemoryBlobStore::new()),
            catalog: Arc::new(MemoryCatalog::new()),
            config: LibraryConfig::default(),
        }
    }

    /// Open (or create) a filesystem-backed library under `root`:
    /// `blobs/` for payloads, `records/` for record documents, and
    /// `tome.toml` for configuration.
    pub fn open(root: impl AsRef<Path>) -> LibraryResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;

        let blobs = FsBlobStore::open(root.join("blobs"))?;
        let catalog = FsCatalog::open(root.join("records"))?;
        let config = LibraryConfig::load_or_init(&root.join("tome.toml"))?;

        let library = Self {
            blobs: Arc::new(blobs),
            catalog: Arc::new(catalog),
            config,
        };
        library.initialize()?;
        info!(root = %root.display(), "library opened");
        Ok(library)
    }

    /// Assemble a library from explicit backends. The seam for embedding
    /// and for tests that need to observe or fault one side.
    pub fn with_stores(
        blobs: Arc<dyn BlobStore>,
        catalog: Arc<dyn Catalog>,
        config: LibraryConfig,
    ) -> Self {
        Self {
            blobs,
            catalog,
            config,
        }
    }

    /// Ensure the record collection exists. Safe to call repeatedly.
    pub fn initialize(&self) -> LibraryResult<()> {
        self.catalog.initialize()?;
        Ok(())
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// First page at the configured default size.
    pub fn default_page(&self) -> PageRequest {
        PageRequest::first(self.config.default_page_size)
    }

    // ---- Adding books ----

    /// Validate `draft`, store its payload, then insert the record.
    ///
    /// The draft is schema-checked before any storage is touched, so an
    /// invalid draft never costs a stored payload. If the record insert
    /// fails after the payload was stored, the payload is deleted again
    /// (best effort) before the error propagates.
    pub fn add_book(&self, draft: BookDraft, source: ByteSource) -> LibraryResult<BookRecord> {
        let violations = validate_draft(&draft);
        if !violations.is_empty() {
            return Err(CatalogError::SchemaViolation { violations }.into());
        }
        let file_type = FileType::from_file_name(&draft.file_name)?;

        if self.blobs.exists_by_name(&draft.file_name)? {
            warn!(
                name = %draft.file_name,
                "name already holds a payload; storing will replace it"
            );
        }
        let blob_id = self
            .blobs
            .put(&draft.file_name, file_type.content_type(), source)?;

        match self.catalog.insert(draft, blob_id) {
            Ok(record) => {
                info!(record = %record.id, title = %record.title, "book added");
                Ok(record)
            }
            Err(e) => {
                // The payload went in before the record failed; take it
                // back out so nothing dangles.
                if let Err(cleanup) = self.blobs.delete(&blob_id) {
                    warn!(blob = %blob_id, error = %cleanup, "payload cleanup failed");
                }
                Err(e.into())
            }
        }
    }

    /// Add a batch in order, stopping at the first failure.
    ///
    /// Already-added books stay added; the caller learns which book broke
    /// the run from the error.
    pub fn add_books(&self, books: Vec<SeedBook>) -> LibraryResult<Vec<BookRecord>> {
        let mut records = Vec::with_capacity(books.len());
        for book in books {
            let record = self.add_book(book.draft, ByteSource::from_bytes(book.payload))?;
            records.push(record);
        }
        info!(count = records.len(), "bulk load complete");
        Ok(records)
    }

    /// Load the bundled demo catalog.
    pub fn seed(&self) -> LibraryResult<Vec<BookRecord>> {
        self.add_books(seed::sample_books()?)
    }

    // ---- Reading ----

    pub fn book(&self, id: &RecordId) -> LibraryResult<BookRecord> {
        Ok(self.catalog.find_by_id(id)?)
    }

    pub fn books(&self) -> LibraryResult<Vec<BookRecord>> {
        Ok(self.catalog.list()?)
    }

    pub fn count(&self) -> LibraryResult<usize> {
        Ok(self.catalog.count()?)
    }

    /// Run a filtered, paginated query over the current records.
    pub fn search(
        &self,
        filter: &QueryFilter,
        page: &PageRequest,
    ) -> LibraryResult<Page<BookRecord>> {
        let snapshot = self.catalog.list()?;
        Ok(run_query(&snapshot, filter, page)?)
    }

    /// One page of the whole catalog, unfiltered.
    pub fn list(&self, page: &PageRequest) -> LibraryResult<Page<BookRecord>> {
        self.search(&QueryFilter::all(), page)
    }

    // ---- Editing ----

    /// Replace one scalar field of a record.
    pub fn set_field(&self, id: &RecordId, update: FieldUpdate) -> LibraryResult<BookRecord> {
        debug!(record = %id, field = update.field_name(), "updating field");
        Ok(self.catalog.update_field(id, update)?)
    }

    /// Append values to one of the record's list fields.
    pub fn push_list_values(
        &self,
        id: &RecordId,
        field: ListField,
        values: Vec<String>,
    ) -> LibraryResult<BookRecord> {
        debug!(record = %id, field = field.field_name(), count = values.len(), "appending values");
        Ok(self.catalog.append_to_list(id, field, values)?)
    }

    /// Remove one exact value from one of the record's list fields.
    pub fn pull_list_value(
        &self,
        id: &RecordId,
        field: ListField,
        value: &str,
    ) -> LibraryResult<BookRecord> {
        debug!(record = %id, field = field.field_name(), "removing value");
        Ok(self.catalog.remove_from_list(id, field, value)?)
    }

    // ---- Removing ----

    /// Remove a book and its payload. Returns `false` when no record had
    /// the ID; removing twice is not an error.
    pub fn remove_book(&self, id: &RecordId) -> LibraryResult<bool> {
        let record = match self.catalog.find_by_id(id) {
            Ok(record) => record,
            Err(CatalogError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.catalog.delete(id)?;
        self.blobs.delete(&record.blob_id)?;
        info!(record = %id, title = %record.title, "book removed");
        Ok(true)
    }

    // ---- Payload delivery ----

    /// The stored payload for a record, with metadata.
    pub fn fetch_file(&self, id: &RecordId) -> LibraryResult<BlobObject> {
        let record = self.catalog.find_by_id(id)?;
        Ok(self.blobs.get(&record.blob_id)?)
    }

    /// Write a record's payload into `dest_dir` under its stored file
    /// name and mark the written file read-only. An earlier export at the
    /// same path is removed first.
    pub fn export_file(&self, id: &RecordId, dest_dir: impl AsRef<Path>) -> LibraryResult<PathBuf> {
        let object = self.fetch_file(id)?;
        let dest_dir = dest_dir.as_ref();
        fs::create_dir_all(dest_dir)?;

        let dest = dest_dir.join(&object.logical_name);
        if dest.exists() {
            // Earlier exports are read-only; remove before rewriting.
            fs::remove_file(&dest)?;
        }
        fs::write(&dest, &object.data)?;

        let mut permissions = fs::metadata(&dest)?.permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&dest, permissions)?;

        info!(record = %id, dest = %dest.display(), "payload exported");
        Ok(dest)
    }
}
