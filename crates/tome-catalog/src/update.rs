//! Targeted record edits.
//!
//! Callers never hand the repository a whole replacement record; they name
//! one field and its new value. `file_name`, `file_type`, and `blob_id` are
//! deliberately absent here: the stored payload and its metadata only change
//! through a full payload replacement, not a field edit.

use std::str::FromStr;

use chrono::NaiveDate;

use tome_types::{Author, BookRecord};

use crate::error::CatalogError;

/// Replacement value for one scalar field of a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    Title(String),
    Authors(Vec<Author>),
    Language(String),
    PublishedDate(NaiveDate),
    Isbn(String),
    /// `None` clears the field.
    SetYear(Option<String>),
    /// `None` clears the field.
    SetMainLocation(Option<String>),
    /// `None` clears the field.
    Copyright(Option<String>),
}

impl FieldUpdate {
    /// Name of the field this update targets, for logs and messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Title(_) => "title",
            FieldUpdate::Authors(_) => "authors",
            FieldUpdate::Language(_) => "language",
            FieldUpdate::PublishedDate(_) => "published_date",
            FieldUpdate::Isbn(_) => "isbn",
            FieldUpdate::SetYear(_) => "set_year",
            FieldUpdate::SetMainLocation(_) => "set_main_location",
            FieldUpdate::Copyright(_) => "copyright",
        }
    }
}

/// The list-valued record fields that support append and remove edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListField {
    Genres,
    SubGenres,
    MainCharacters,
}

impl ListField {
    /// Name of the list field, for logs and messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            ListField::Genres => "genres",
            ListField::SubGenres => "sub_genres",
            ListField::MainCharacters => "main_characters",
        }
    }

    pub(crate) fn items_mut<'a>(&self, record: &'a mut BookRecord) -> &'a mut Vec<String> {
        match self {
            ListField::Genres => &mut record.genres,
            ListField::SubGenres => &mut record.sub_genres,
            ListField::MainCharacters => &mut record.main_characters,
        }
    }
}

impl FromStr for ListField {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "genres" | "genre" => Ok(ListField::Genres),
            "sub-genres" | "sub_genres" | "sub-genre" | "sub_genre" => Ok(ListField::SubGenres),
            "characters" | "main-characters" | "main_characters" | "character" => {
                Ok(ListField::MainCharacters)
            }
            other => Err(CatalogError::UnknownListField(other.to_string())),
        }
    }
}

/// Apply a scalar update to a record in place. The caller re-validates the
/// record afterward; this only moves the value.
pub(crate) fn apply_field_update(record: &mut BookRecord, update: FieldUpdate) {
    match update {
        FieldUpdate::Title(title) => record.title = title,
        FieldUpdate::Authors(authors) => record.authors = authors,
        FieldUpdate::Language(language) => record.language = language,
        FieldUpdate::PublishedDate(date) => record.published_date = date,
        FieldUpdate::Isbn(isbn) => record.isbn = isbn,
        FieldUpdate::SetYear(year) => record.set_year = year,
        FieldUpdate::SetMainLocation(location) => record.set_main_location = location,
        FieldUpdate::Copyright(copyright) => record.copyright = copyright,
    }
}
