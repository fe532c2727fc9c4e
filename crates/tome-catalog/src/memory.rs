use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use tome_types::{BlobId, BookDraft, BookRecord, RecordId};

use crate::error::{CatalogError, CatalogResult};
use crate::schema::{self, Violation};
use crate::traits::Catalog;
use crate::update::{self, FieldUpdate, ListField};

#[derive(Default)]
struct CatalogState {
    /// Sequence-keyed records; `BTreeMap` iteration yields insertion order.
    records: BTreeMap<u64, BookRecord>,
    /// Record ID to its sequence number.
    index: HashMap<RecordId, u64>,
    next_seq: u64,
}

/// In-memory catalog backend.
///
/// Non-persistent; intended for tests and throwaway sessions. Insertion
/// order survives interleaved deletes because sequence numbers are never
/// reused.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<CatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch, edit, re-validate, and store one record under the write lock.
    fn mutate<F>(&self, id: &RecordId, apply: F) -> CatalogResult<BookRecord>
    where
        F: FnOnce(&mut BookRecord),
    {
        let mut state = self
            .inner
            .write()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))?;
        let seq = *state.index.get(id).ok_or(CatalogError::NotFound(*id))?;
        let mut updated = state
            .records
            .get(&seq)
            .ok_or(CatalogError::NotFound(*id))?
            .clone();
        apply(&mut updated);
        schema::ensure_valid(&updated.to_draft())?;
        state.records.insert(seq, updated.clone());
        Ok(updated)
    }
}

impl Catalog for MemoryCatalog {
    fn initialize(&self) -> CatalogResult<()> {
        // Nothing to prepare; the maps exist from construction.
        Ok(())
    }

    fn insert(&self, draft: BookDraft, blob_id: BlobId) -> CatalogResult<BookRecord> {
        schema::ensure_valid(&draft)?;
        let record = BookRecord::from_draft(RecordId::new(), blob_id, draft).map_err(|e| {
            CatalogError::SchemaViolation {
                violations: vec![Violation::new("file_name", e.to_string())],
            }
        })?;

        let mut state = self
            .inner
            .write()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))?;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.index.insert(record.id, seq);
        state.records.insert(seq, record.clone());
        Ok(record)
    }

    fn find_by_id(&self, id: &RecordId) -> CatalogResult<BookRecord> {
        let state = self
            .inner
            .read()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))?;
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
        let mut state = self
            .inner
            .write()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))?;
        match state.index.remove(id) {
            Some(seq) => {
                state.records.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self) -> CatalogResult<usize> {
        let state = self
            .inner
            .read()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))?;
        Ok(state.records.len())
    }

    fn list(&self) -> CatalogResult<Vec<BookRecord>> {
        let state = self
            .inner
            .read()
            .map_err(|e| CatalogError::Serialization(format!("lock poisoned: {e}")))?;
        Ok(state.records.values().cloned().collect())
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
        .with_author(Author::with_pseudonym(
            "Mary Wollstonecraft Shelley",
            "Mary Shelley",
        ))
        .with_genres(["Horror", "Gothic"])
        .with_main_characters(["Victor Frankenstein", "The Monster"])
        .with_set_year("1797")
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
        .with_genres(["Adventure"])
    }

    fn catalog_with_one() -> (MemoryCatalog, BookRecord) {
        let catalog = MemoryCatalog::new();
        let record = catalog.insert(frankenstein(), BlobId::new()).unwrap();
        (catalog, record)
    }

    // ---- Test 1: insert assigns identifiers and derives file type ----

    #[test]
    fn insert_assigns_id_and_file_type() {
        let catalog = MemoryCatalog::new();
        let blob_id = BlobId::new();
        let record = catalog.insert(frankenstein(), blob_id).unwrap();

        assert_eq!(record.file_type, tome_types::FileType::Epub);
        assert_eq!(record.blob_id, blob_id);
        assert_eq!(catalog.count().unwrap(), 1);

        let fetched = catalog.find_by_id(&record.id).unwrap();
        assert_eq!(fetched, record);
    }

    // ---- Test 2: invalid drafts are rejected with the full violation list ----

    #[test]
    fn insert_rejects_invalid_draft_with_every_violation() {
        let catalog = MemoryCatalog::new();
        let mut draft = frankenstein();
        draft.title = String::new();
        draft.authors.clear();
        draft.file_name = "Frankenstein.mobi".into();

        let err = catalog.insert(draft, BlobId::new()).unwrap_err();
        match err {
            CatalogError::SchemaViolation { violations } => {
                let fields: Vec<&str> =
                    violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "authors", "file_name"]);
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
        assert_eq!(catalog.count().unwrap(), 0);
    }

    // ---- Test 3: lookups miss with a typed error ----

    #[test]
    fn find_by_id_unknown_is_not_found() {
        let catalog = MemoryCatalog::new();
        let missing = RecordId::new();
        assert!(matches!(
            catalog.find_by_id(&missing),
            Err(CatalogError::NotFound(id)) if id == missing
        ));
    }

    // ---- Test 4: scalar updates replace the field and return the record ----

    #[test]
    fn update_field_replaces_scalar() {
        let (catalog, record) = catalog_with_one();
        let updated = catalog
            .update_field(&record.id, FieldUpdate::Language("German".into()))
            .unwrap();
        assert_eq!(updated.language, "German");
        assert_eq!(catalog.find_by_id(&record.id).unwrap().language, "German");
    }

    // ---- Test 5: updates re-validate; bad edits leave the record intact ----

    #[test]
    fn update_field_revalidates_and_rolls_back() {
        let (catalog, record) = catalog_with_one();
        let err = catalog
            .update_field(&record.id, FieldUpdate::Title(String::new()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::SchemaViolation { .. }));

        let stored = catalog.find_by_id(&record.id).unwrap();
        assert_eq!(stored.title, "Frankenstein; Or, The Modern Prometheus");
    }

    // ---- Test 6: authors can be replaced wholesale but never emptied ----

    #[test]
    fn authors_update_replaces_but_rejects_empty() {
        let (catalog, record) = catalog_with_one();
        let updated = catalog
            .update_field(
                &record.id,
                FieldUpdate::Authors(vec![
                    Author::new("Mary Shelley"),
                    Author::new("Percy Shelley"),
                ]),
            )
            .unwrap();
        assert_eq!(updated.authors.len(), 2);

        let err = catalog
            .update_field(&record.id, FieldUpdate::Authors(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::SchemaViolation { .. }));
        assert_eq!(catalog.find_by_id(&record.id).unwrap().authors.len(), 2);
    }

    // ---- Test 7: optional scalars set, change, and clear ----

    #[test]
    fn optional_scalars_set_and_clear() {
        let (catalog, record) = catalog_with_one();

        let updated = catalog
            .update_field(&record.id, FieldUpdate::SetMainLocation(Some("Geneva".into())))
            .unwrap();
        assert_eq!(updated.set_main_location.as_deref(), Some("Geneva"));

        let cleared = catalog
            .update_field(&record.id, FieldUpdate::SetYear(None))
            .unwrap();
        assert_eq!(cleared.set_year, None);
    }

    // ---- Test 8: published date updates parse through chrono ----

    #[test]
    fn published_date_updates() {
        let (catalog, record) = catalog_with_one();
        let date = NaiveDate::from_ymd_opt(1818, 1, 1).unwrap();
        let updated = catalog
            .update_field(&record.id, FieldUpdate::PublishedDate(date))
            .unwrap();
        assert_eq!(updated.published_date, date);
    }

    // ---- Test 9: list appends extend in order ----

    #[test]
    fn append_to_list_extends() {
        let (catalog, record) = catalog_with_one();
        let updated = catalog
            .append_to_list(
                &record.id,
                ListField::Genres,
                vec!["Science Fiction".into()],
            )
            .unwrap();
        assert_eq!(updated.genres, vec!["Horror", "Gothic", "Science Fiction"]);
    }

    // ---- Test 10: list removal matches exactly and strips every copy ----

    #[test]
    fn remove_from_list_is_exact_and_complete() {
        let (catalog, record) = catalog_with_one();
        catalog
            .append_to_list(&record.id, ListField::Genres, vec!["Horror".into()])
            .unwrap();

        let updated = catalog
            .remove_from_list(&record.id, ListField::Genres, "Horror")
            .unwrap();
        assert_eq!(updated.genres, vec!["Gothic"]);

        // Near-matches are left alone.
        let untouched = catalog
            .remove_from_list(&record.id, ListField::Genres, "gothic")
            .unwrap();
        assert_eq!(untouched.genres, vec!["Gothic"]);
    }

    // ---- Test 11: removing an absent value is a quiet success ----

    #[test]
    fn remove_absent_value_is_noop() {
        let (catalog, record) = catalog_with_one();
        let updated = catalog
            .remove_from_list(&record.id, ListField::SubGenres, "Space Opera")
            .unwrap();
        assert!(updated.sub_genres.is_empty());
    }

    // ---- Test 12: edits against a missing record fail typed ----

    #[test]
    fn edits_on_missing_record_are_not_found() {
        let catalog = MemoryCatalog::new();
        let missing = RecordId::new();
        assert!(matches!(
            catalog.update_field(&missing, FieldUpdate::Title("x".into())),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.append_to_list(&missing, ListField::Genres, vec!["x".into()]),
            Err(CatalogError::NotFound(_))
        ));
    }

    // ---- Test 13: delete reports prior existence and is idempotent ----

    #[test]
    fn delete_reports_existence() {
        let (catalog, record) = catalog_with_one();
        assert!(catalog.delete(&record.id).unwrap());
        assert!(!catalog.delete(&record.id).unwrap());
        assert_eq!(catalog.count().unwrap(), 0);
        assert!(matches!(
            catalog.find_by_id(&record.id),
            Err(CatalogError::NotFound(_))
        ));
    }

    // ---- Test 14: list preserves insertion order across deletes ----

    #[test]
    fn list_keeps_insertion_order_across_deletes() {
        let catalog = MemoryCatalog::new();
        let first = catalog.insert(frankenstein(), BlobId::new()).unwrap();
        let second = catalog.insert(moby_dick(), BlobId::new()).unwrap();

        let mut third = frankenstein();
        third.title = "The Last Man".into();
        third.file_name = "The Last Man.epub".into();
        let third = catalog.insert(third, BlobId::new()).unwrap();

        catalog.delete(&second.id).unwrap();

        let mut fourth = moby_dick();
        fourth.title = "Typee".into();
        fourth.file_name = "Typee.pdf".into();
        let fourth = catalog.insert(fourth, BlobId::new()).unwrap();

        let titles: Vec<String> = catalog
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                first.title.clone(),
                third.title.clone(),
                fourth.title.clone()
            ]
        );
    }

    // ---- Test 15: concurrent readers do not block one another ----

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;

        let (catalog, record) = catalog_with_one();
        let catalog = Arc::new(catalog);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let id = record.id;
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        assert!(catalog.find_by_id(&id).is_ok());
                        assert_eq!(catalog.count().unwrap(), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
