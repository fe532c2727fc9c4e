use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::file_type::FileType;
use crate::id::{BlobId, RecordId};

/// A single author entry. `pseudonym` is the publishing name when it
/// differs from the legal name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudonym: Option<String>,
}

impl Author {
    /// Author publishing under their own name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pseudonym: None,
        }
    }

    /// Author with a publishing pseudonym.
    pub fn with_pseudonym(name: impl Into<String>, pseudonym: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pseudonym: Some(pseudonym.into()),
        }
    }

    /// The name the author is best known by.
    pub fn display_name(&self) -> &str {
        self.pseudonym.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pseudonym {
            Some(pseudonym) => write!(f, "{} (as {pseudonym})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Caller-supplied book data, before validation and identifier assignment.
///
/// A draft carries everything a [`BookRecord`] does except the fields the
/// repository assigns at insert time: `id`, `file_type`, and `blob_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub authors: Vec<Author>,
    pub language: String,
    pub published_date: NaiveDate,
    pub genres: Vec<String>,
    pub sub_genres: Vec<String>,
    pub main_characters: Vec<String>,
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_main_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    pub file_name: String,
}

impl BookDraft {
    /// Draft with the required scalar fields; authors and lists start empty.
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        isbn: impl Into<String>,
        published_date: NaiveDate,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            language: language.into(),
            published_date,
            genres: Vec::new(),
            sub_genres: Vec::new(),
            main_characters: Vec::new(),
            isbn: isbn.into(),
            set_year: None,
            set_main_location: None,
            copyright: None,
            file_name: file_name.into(),
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.genres.extend(genres.into_iter().map(Into::into));
        self
    }

    pub fn with_sub_genres(mut self, sub_genres: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sub_genres.extend(sub_genres.into_iter().map(Into::into));
        self
    }

    pub fn with_main_characters(
        mut self,
        characters: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.main_characters.extend(characters.into_iter().map(Into::into));
        self
    }

    pub fn with_set_year(mut self, year: impl Into<String>) -> Self {
        self.set_year = Some(year.into());
        self
    }

    pub fn with_set_main_location(mut self, location: impl Into<String>) -> Self {
        self.set_main_location = Some(location.into());
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }
}

/// A persisted catalog record.
///
/// Only a repository insert creates one: `id` and `blob_id` are assigned
/// there and `file_type` is derived from the file name, never supplied by
/// the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: RecordId,
    pub title: String,
    pub authors: Vec<Author>,
    pub language: String,
    pub published_date: NaiveDate,
    pub genres: Vec<String>,
    pub sub_genres: Vec<String>,
    pub main_characters: Vec<String>,
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_main_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    pub file_name: String,
    pub file_type: FileType,
    pub blob_id: BlobId,
}

impl BookRecord {
    /// Assemble a record from a draft and the identifiers assigned at
    /// insert time. Fails if the draft's file name has no recognized
    /// document extension.
    pub fn from_draft(id: RecordId, blob_id: BlobId, draft: BookDraft) -> Result<Self, TypeError> {
        let file_type = FileType::from_file_name(&draft.file_name)?;
        Ok(Self {
            id,
            title: draft.title,
            authors: draft.authors,
            language: draft.language,
            published_date: draft.published_date,
            genres: draft.genres,
            sub_genres: draft.sub_genres,
            main_characters: draft.main_characters,
            isbn: draft.isbn,
            set_year: draft.set_year,
            set_main_location: draft.set_main_location,
            copyright: draft.copyright,
            file_name: draft.file_name,
            file_type,
            blob_id,
        })
    }

    /// The draft shape of this record, with assigned fields stripped.
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            authors: self.authors.clone(),
            language: self.language.clone(),
            published_date: self.published_date,
            genres: self.genres.clone(),
            sub_genres: self.sub_genres.clone(),
            main_characters: self.main_characters.clone(),
            isbn: self.isbn.clone(),
            set_year: self.set_year.clone(),
            set_main_location: self.set_main_location.clone(),
            copyright: self.copyright.clone(),
            file_name: self.file_name.clone(),
        }
    }

    /// Comma-separated author line for human-facing output.
    pub fn author_line(&self) -> String {
        self.authors
            .iter()
            .map(Author::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
