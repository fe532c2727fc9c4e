//! The bundled demo catalog.
//!
//! Seventeen books: Frankenstein and Moby Dick with full metadata, plus
//! fifteen numbered records (`book_test2` through `book_test16`) whose
//! languages, genres, and characters give search and pagination something
//! to chew on. Payloads are synthesized placeholder text; the fixture
//! carries metadata only.

use bytes::Bytes;

use tome_types::BookDraft;

use crate::error::{LibraryError, LibraryResult};

/// One seedable book: a draft plus the payload to store for it.
#[derive(Clone, Debug)]
pub struct SeedBook {
    pub draft: BookDraft,
    pub payload: Bytes,
}

impl SeedBook {
    pub fn new(draft: BookDraft, payload: impl Into<Bytes>) -> Self {
        Self {
            draft,
            payload: payload.into(),
        }
    }
}

const FIXTURE: &str = include_str!("../fixtures/seed_books.json");

/// The demo catalog with placeholder payloads, ready for
/// [`Library::add_books`](crate::Library::add_books).
pub fn sample_books() -> LibraryResult<Vec<SeedBook>> {
    let drafts: Vec<BookDraft> =
        serde_json::from_str(FIXTURE).map_err(|e| LibraryError::Fixture(e.to_string()))?;
    Ok(drafts
        .into_iter()
        .map(|draft| {
            let payload = placeholder_payload(&draft);
            SeedBook::new(draft, payload)
        })
        .collect())
}

fn placeholder_payload(draft: &BookDraft) -> Bytes {
    Bytes::from(format!(
        "placeholder payload for {} ({})\n",
        draft.title, draft.file_name
    ))
}
