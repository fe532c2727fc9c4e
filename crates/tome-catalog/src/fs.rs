//! Filesystem catalog backend.
//!
//! One JSON document per record, named by record ID, carrying the record
//! plus its insertion sequence number so listing order survives restarts.
//! The whole collection is indexed into memory at open; writes go to disk
//! before the in-memory index is touched, so a failed write never leaves
//! the index ahead of the files.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tome_types::{BlobId, BookDraft, BookRecord, RecordId};

use crate::error::{CatalogError, CatalogResult};
use crate::schema::{self, Violation};
use crate::traits::Catalog;
use crate::update::{self, FieldUpdate, ListField};

/// On-disk shape of one record: the record and its insertion sequence.
#[derive(Serialize, Deserialize)]
struct RecordDocument {
    seq: u64,
    record: BookRecord,
}

#[derive(Default)]
struct CatalogState {
    records: BTreeMap<u64, BookRecord>,
    index: HashMap<RecordId, u64>,
    next_seq: u64,
}

/// Filesystem catalog backend.
///
/// Documents live directly under the records directory as
/// `<record-id>.json`. Unreadable documents are skipped at open with a
/// warning rather than failing the whole catalog.
pub struct FsCatalog {
    dir: PathBuf,
    inner: RwLock<CatalogState>,
}

impl FsCatalog {
    /// Open (or create) the catalog rooted at `dir` and index every record
    /// document found there.
    pub fn open(dir: impl Into<PathBuf>) -> CatalogResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CatalogError::Initialization {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let mut state = CatalogState::default();
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    serde_json::from_slice::<RecordDocument>(&bytes).map_err(|e| e.to_string())
                });
            let doc = match parsed {
                Ok(doc) => doc,
                Err(reason) => {
                    warn!(
                        path = %path.display(),
                        %reason,
                        "skipping unreadable record document"
                    );
                    continue;
                }
            };
            state.next_seq = state.next_seq.max(doc.seq + 1);
            state.index.insert(doc.record.id, doc.seq);
            state.records.insert(doc.seq, doc.record);
        }
        debug!(
            dir = %dir.display(),
            records = state.records.len(),
            "catalog opened"
        );

        Ok(Self {
            dir,
            inner: RwLock::new(state),
        })
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read_state(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.inner
            .read()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))
    }

    fn write_state(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.inner
            .write()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))
    }

    fn write_document(&self, seq: u64, record: &BookRecord) -> CatalogResult<()> {
        let doc = RecordDocument {
            seq,
            record: record.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let path = self.record_path(&record.id);
        let mut file = File::create(&path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    /// Fetch, edit, re-validate, write to disk, then update the index.
    fn mutate<F>(&self, id: &RecordId, apply: F) -> CatalogResult<BookRecord>
    where
        F: FnOnce(&mut BookRecord),
    {
        let mut state = self.write_state()?;
        let seq = *state.index.get(id).ok_or(CatalogError::NotFound(*id))?;
        let mut updated = state
            .records
            .get(&seq)
            .ok_or(CatalogError::NotFound(*id))?
            .clone();
        apply(&mut updated);
        schema::ensure_valid(&updated.to_draft())?;
        self.write_document(seq, &updated)?;
        state.records.insert(seq, updated.clone());
        Ok(updated)
    }
}

impl Catalog for FsCatalog {
    fn initialize(&self) -> CatalogResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| CatalogError::Initialization {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;
        if !self.dir.is_dir() {
            return Err(CatalogError::Initialization {
                path: self.dir.clone(),
                reason: "records directory missing after creation".into(),
            });
        }
        Ok(())
    }

    fn insert(&self, draft: BookDraft, blob_id: BlobId) -> CatalogResult<BookRecord> {
        schema::ensure_valid(&draft)?;
        let record = BookRecord::from_draft(RecordId::new(), blob_id, draft).map_err(|e| {
            CatalogError::SchemaViolation {
                violations: vec![Violation::new("file_name", e.to_string())],
            }
        })?;

        let mut state = self.write_state()?;
        let seq = state.next_seq;
        self.write_document(seq, &record)?;
        state.next_seq = seq + 1;
        state.index.insert(record.id, seq);
        state.records.insert(seq, record.clone());
        debug!(record = %record.id, seq, title = %record.title, "record inserted");
        Ok(record)
    }

    fn find_by_id(&self, id: &RecordId) -> CatalogResult<BookRecord> {
        let state = self.read_state()?;
        let seq = state.index.get(id).ok_or(CatalogError::NotFound(*id))?;
        state
            .records
            .get(seq)
            .cloned()
            .ok_or(CatalogError::NotFound(*id))
    }

    fn update_field(&self, id: &RecordId, update: FieldUpdate) -> CatalogResult<BookRecord> {
        self.mutate(id, |record| update::apply_field_update(record, update))
    }

    fn append_to_list(
        &self,
        id: &RecordId,
        field: ListField,
        values: Vec<String>,
    ) -> CatalogResult<BookRecord> {
        self.mutate(id, |record| field.items_mut(record).extend(values))
    }

    fn remove_from_list(
        &self,
        id: &RecordId,
        field: ListField,
        value: &str,
    ) -> CatalogResult<BookRecord> {
        self.mutate(id, |record| {
            field.items_mut(record).retain(|item| item != value);
        })
    }

    fn delete(&self, id: &RecordId) -> CatalogResult<bool> {
        let mut state = self.write_state()?;
        let seq = match state.index.remove(id) {
            Some(seq) => seq,
            None => return Ok(false),
        };
        state.records.remove(&seq);
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        debug!(record = %id, "record deleted");
        Ok(true)
    }

    fn count(&self) -> CatalogResult<usize> {
        Ok(self.read_state()?.records.len())
    }

    fn list(&self) -> CatalogResult<Vec<BookRecord>> {
        Ok(self.read_state()?.records.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tome_types::Author;

    use super::*;

    fn frankenstein() -> BookDraft {
        BookDraft::new(
            "Frankenstein; Or, The Modern Prometheus",
            "English",
            "978-1-59308-510-1",
            NaiveDate::from_ymd_opt(1993, 10, 1).unwrap(),
            "Frankenstein.epub",
        )
        .with_author(Author::new("Mary Shelley"))
        .with_genres(["Horror", "Gothic"])
    }

    fn moby_dick() -> BookDraft {
        BookDraft::new(
            "Moby Dick; Or, The Whale",
            "English",
            "978-1503280786",
            NaiveDate::from_ymd_opt(2001, 7, 1).unwrap(),
            "Moby-Dick.pdf",
        )
        .with_author(Author::new("Herman Melville"))
    }

    // ---- Test 1: records and their order survive a reopen ----

    #[test]
    fn records_survive_reopen_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        let first_id;
        {
            let catalog = FsCatalog::open(&dir).unwrap();
            first_id = catalog.insert(frankenstein(), BlobId::new()).unwrap().id;
            catalog.insert(moby_dick(), BlobId::new()).unwrap();
        }

        let reopened = FsCatalog::open(&dir).unwrap();
        assert_eq!(reopened.count().unwrap(), 2);
        let titles: Vec<String> = reopened
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Frankenstein; Or, The Modern Prometheus",
                "Moby Dick; Or, The Whale"
            ]
        );
        assert!(reopened.find_by_id(&first_id).is_ok());
    }

    // ---- Test 2: edits are durable ----

    #[test]
    fn updates_persist_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        let id;
        {
            let catalog = FsCatalog::open(&dir).unwrap();
            id = catalog.insert(frankenstein(), BlobId::new()).unwrap().id;
            catalog
                .update_field(&id, FieldUpdate::Language("German".into()))
                .unwrap();
            catalog
                .append_to_list(&id, ListField::Genres, vec!["Science Fiction".into()])
                .unwrap();
        }

        let reopened = FsCatalog::open(&dir).unwrap();
        let record = reopened.find_by_id(&id).unwrap();
        assert_eq!(record.language, "German");
        assert_eq!(record.genres, vec!["Horror", "Gothic", "Science Fiction"]);
    }

    // ---- Test 3: a rejected edit rewrites nothing ----

    #[test]
    fn rejected_update_leaves_disk_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        let id;
        {
            let catalog = FsCatalog::open(&dir).unwrap();
            id = catalog.insert(frankenstein(), BlobId::new()).unwrap().id;
            let err = catalog
                .update_field(&id, FieldUpdate::Title(String::new()))
                .unwrap_err();
            assert!(matches!(err, CatalogError::SchemaViolation { .. }));
        }

        let reopened = FsCatalog::open(&dir).unwrap();
        assert_eq!(
            reopened.find_by_id(&id).unwrap().title,
            "Frankenstein; Or, The Modern Prometheus"
        );
    }

    // ---- Test 4: delete removes the document file ----

    #[test]
    fn delete_removes_document_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        let catalog = FsCatalog::open(&dir).unwrap();
        let kept = catalog.insert(frankenstein(), BlobId::new()).unwrap();
        let dropped = catalog.insert(moby_dick(), BlobId::new()).unwrap();

        assert!(catalog.delete(&dropped.id).unwrap());
        assert!(!catalog.record_path(&dropped.id).exists());
        assert!(catalog.record_path(&kept.id).exists());
        assert!(!catalog.delete(&dropped.id).unwrap());

        let reopened = FsCatalog::open(&dir).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }

    // ---- Test 5: corrupt documents are skipped, not fatal ----

    #[test]
    fn corrupt_document_is_skipped_on_open() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        {
            let catalog = FsCatalog::open(&dir).unwrap();
            catalog.insert(frankenstein(), BlobId::new()).unwrap();
        }
        fs::write(dir.join("mangled.json"), b"{ not json").unwrap();
        fs::write(dir.join("notes.txt"), b"ignored entirely").unwrap();

        let reopened = FsCatalog::open(&dir).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }

    // ---- Test 6: inserts after a reopen list after existing records ----

    #[test]
    fn inserts_after_reopen_follow_existing_records() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        {
            let catalog = FsCatalog::open(&dir).unwrap();
            catalog.insert(frankenstein(), BlobId::new()).unwrap();
            let second = catalog.insert(moby_dick(), BlobId::new()).unwrap();
            catalog.delete(&second.id).unwrap();
        }

        let reopened = FsCatalog::open(&dir).unwrap();
        let mut late = moby_dick();
        late.title = "Typee".into();
        reopened.insert(late, BlobId::new()).unwrap();

        let titles: Vec<String> = reopened
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Frankenstein; Or, The Modern Prometheus", "Typee"]
        );
    }

    // ---- Test 7: rejected inserts write no files ----

    #[test]
    fn invalid_insert_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");

        let catalog = FsCatalog::open(&dir).unwrap();
        let mut draft = frankenstein();
        draft.authors.clear();
        assert!(catalog.insert(draft, BlobId::new()).is_err());

        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert!(entries.is_empty());
        assert_eq!(catalog.count().unwrap(), 0);
    }

    // ---- Test 8: initialize recreates a missing records directory ----

    #[test]
    fn initialize_recreates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("deep").join("records");

        let catalog = FsCatalog::open(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert!(!dir.exists());

        catalog.initialize().unwrap();
        assert!(dir.is_dir());
    }
}
