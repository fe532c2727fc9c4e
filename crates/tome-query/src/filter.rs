//! Search predicates and the document-type facet.
//!
//! A query carries at most one field predicate. String fields match by
//! case-insensitive substring; `set_year` matches exactly, so searching
//! "179" never pulls in a book set in 1797. The facet composes with the
//! predicate by conjunction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tome_types::{BookRecord, FileType};

use crate::error::QueryError;

/// A record field the search predicate can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchField {
    Title,
    /// Matches author names and pseudonyms alike.
    Author,
    Language,
    Isbn,
    Genre,
    SubGenre,
    MainCharacter,
    /// Matched exactly, never as a substring.
    SetYear,
    SetMainLocation,
    FileName,
}

impl SearchField {
    /// The user-facing spelling, as accepted back by [`FromStr`].
    pub fn field_name(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Language => "language",
            SearchField::Isbn => "isbn",
            SearchField::Genre => "genre",
            SearchField::SubGenre => "sub-genre",
            SearchField::MainCharacter => "character",
            SearchField::SetYear => "set-year",
            SearchField::SetMainLocation => "location",
            SearchField::FileName => "file-name",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for SearchField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "language" => Ok(SearchField::Language),
            "isbn" => Ok(SearchField::Isbn),
            "genre" => Ok(SearchField::Genre),
            "sub-genre" | "sub_genre" | "subgenre" => Ok(SearchField::SubGenre),
            "character" | "main-character" | "main_character" => Ok(SearchField::MainCharacter),
            "set-year" | "set_year" | "year" => Ok(SearchField::SetYear),
            "location" | "set-main-location" | "set_main_location" => {
                Ok(SearchField::SetMainLocation)
            }
            "file-name" | "file_name" | "filename" => Ok(SearchField::FileName),
            other => Err(QueryError::UnknownField(other.to_string())),
        }
    }
}

/// Restriction on the stored document type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFacet {
    /// No restriction.
    #[default]
    All,
    /// Only records whose stored file is of this type.
    Only(FileType),
}

impl TypeFacet {
    pub fn admits(&self, file_type: FileType) -> bool {
        match self {
            TypeFacet::All => true,
            TypeFacet::Only(only) => *only == file_type,
        }
    }
}

/// One field predicate: `pattern` matched against `field`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPredicate {
    pub field: SearchField,
    pub pattern: String,
}

impl FieldPredicate {
    pub fn new(field: SearchField, pattern: impl Into<String>) -> Self {
        Self {
            field,
            pattern: pattern.into(),
        }
    }

    /// Whether `record` satisfies this predicate.
    pub fn matches(&self, record: &BookRecord) -> bool {
        let pattern = self.pattern.as_str();
        match self.field {
            SearchField::Title => contains_ci(&record.title, pattern),
            SearchField::Author => record.authors.iter().any(|author| {
                contains_ci(&author.name, pattern)
                    || author
                        .pseudonym
                        .as_deref()
                        .is_some_and(|pseudonym| contains_ci(pseudonym, pattern))
            }),
            SearchField::Language => contains_ci(&record.language, pattern),
            SearchField::Isbn => contains_ci(&record.isbn, pattern),
            SearchField::Genre => record.genres.iter().any(|g| contains_ci(g, pattern)),
            SearchField::SubGenre => record.sub_genres.iter().any(|g| contains_ci(g, pattern)),
            SearchField::MainCharacter => record
                .main_characters
                .iter()
                .any(|c| contains_ci(c, pattern)),
            SearchField::SetYear => record.set_year.as_deref() == Some(pattern),
            SearchField::SetMainLocation => record
                .set_main_location
                .as_deref()
                .is_some_and(|location| contains_ci(location, pattern)),
            SearchField::FileName => contains_ci(&record.file_name, pattern),
        }
    }
}

/// Complete filter for one query: at most one field predicate, composed
/// with the type facet by conjunction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub predicate: Option<FieldPredicate>,
    pub facet: TypeFacet,
}

impl QueryFilter {
    /// The filter that admits every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// A single-field filter with no type restriction.
    pub fn matching(field: SearchField, pattern: impl Into<String>) -> Self {
        Self {
            predicate: Some(FieldPredicate::new(field, pattern)),
            facet: TypeFacet::All,
        }
    }

    /// Restrict results to one document type.
    pub fn with_facet(mut self, facet: TypeFacet) -> Self {
        self.facet = facet;
        self
    }

    pub fn matches(&self, record: &BookRecord) -> bool {
        if !self.facet.admits(record.file_type) {
            return false;
        }
        match &self.predicate {
            Some(predicate) => predicate.matches(record),
            None => true,
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tome_types::{Author, BlobId, BookDraft, RecordId};

    use super::*;

    fn frankenstein() -> BookRecord {
        let draft = BookDraft::new(
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
        .with_sub_genres(["Gothic Horror"])
        .with_main_characters(["Victor Frankenstein", "The Monster"])
        .with_set_year("1797")
        .with_set_main_location("Switzerland");
        BookRecord::from_draft(RecordId::new(), BlobId::new(), draft).unwrap()
    }

    #[test]
    fn title_matches_case_insensitive_substring() {
        let record = frankenstein();
        assert!(FieldPredicate::new(SearchField::Title, "frankenstein").matches(&record));
        assert!(FieldPredicate::new(SearchField::Title, "MODERN PROM").matches(&record));
        assert!(!FieldPredicate::new(SearchField::Title, "whale").matches(&record));
    }

    #[test]
    fn author_matches_name_and_pseudonym() {
        let record = frankenstein();
        assert!(FieldPredicate::new(SearchField::Author, "wollstonecraft").matches(&record));
        assert!(FieldPredicate::new(SearchField::Author, "mary shelley").matches(&record));
        assert!(!FieldPredicate::new(SearchField::Author, "melville").matches(&record));
    }

    #[test]
    fn set_year_is_exact_not_substring() {
        let record = frankenstein();
        assert!(FieldPredicate::new(SearchField::SetYear, "1797").matches(&record));
        assert!(!FieldPredicate::new(SearchField::SetYear, "179").matches(&record));
        assert!(!FieldPredicate::new(SearchField::SetYear, "1818").matches(&record));
    }

    #[test]
    fn list_fields_stay_in_their_own_lane() {
        let record = frankenstein();
        // "Gothic" appears in genres and sub-genres, but not characters.
        assert!(FieldPredicate::new(SearchField::Genre, "gothic").matches(&record));
        assert!(FieldPredicate::new(SearchField::SubGenre, "gothic").matches(&record));
        assert!(!FieldPredicate::new(SearchField::MainCharacter, "gothic").matches(&record));
        assert!(FieldPredicate::new(SearchField::MainCharacter, "monster").matches(&record));
    }

    #[test]
    fn remaining_scalar_fields_match() {
        let record = frankenstein();
        assert!(FieldPredicate::new(SearchField::Isbn, "59308").matches(&record));
        assert!(FieldPredicate::new(SearchField::Language, "eng").matches(&record));
        assert!(FieldPredicate::new(SearchField::SetMainLocation, "switz").matches(&record));
        assert!(FieldPredicate::new(SearchField::FileName, ".epub").matches(&record));
    }

    #[test]
    fn absent_optionals_never_match() {
        let draft = BookDraft::new(
            "Moby Dick; Or, The Whale",
            "English",
            "978-1503280786",
            NaiveDate::from_ymd_opt(2001, 7, 1).unwrap(),
            "Moby-Dick.pdf",
        )
        .with_author(Author::new("Herman Melville"));
        let record = BookRecord::from_draft(RecordId::new(), BlobId::new(), draft).unwrap();

        assert!(!FieldPredicate::new(SearchField::SetYear, "1797").matches(&record));
        assert!(!FieldPredicate::new(SearchField::SetMainLocation, "sea").matches(&record));
    }

    #[test]
    fn facet_composes_by_conjunction() {
        let record = frankenstein();
        let matching = QueryFilter::matching(SearchField::Title, "frankenstein");
        assert!(matching.clone().matches(&record));
        assert!(matching
            .clone()
            .with_facet(TypeFacet::Only(FileType::Epub))
            .matches(&record));
        assert!(!matching
            .with_facet(TypeFacet::Only(FileType::Pdf))
            .matches(&record));
    }

    #[test]
    fn all_filter_admits_everything() {
        assert!(QueryFilter::all().matches(&frankenstein()));
    }

    #[test]
    fn search_fields_parse_from_user_spellings() {
        assert_eq!("title".parse::<SearchField>().unwrap(), SearchField::Title);
        assert_eq!(
            "Sub-Genre".parse::<SearchField>().unwrap(),
            SearchField::SubGenre
        );
        assert_eq!(
            "set_year".parse::<SearchField>().unwrap(),
            SearchField::SetYear
        );
        assert_eq!(
            "filename".parse::<SearchField>().unwrap(),
            SearchField::FileName
        );
        assert!(matches!(
            "publisher".parse::<SearchField>(),
            Err(QueryError::UnknownField(_))
        ));
    }

    #[test]
    fn field_name_round_trips_through_parse() {
        for field in [
            SearchField::Title,
            SearchField::Author,
            SearchField::Language,
            SearchField::Isbn,
            SearchField::Genre,
            SearchField::SubGenre,
            SearchField::MainCharacter,
            SearchField::SetYear,
            SearchField::SetMainLocation,
            SearchField::FileName,
        ] {
            assert_eq!(field.field_name().parse::<SearchField>().unwrap(), field);
        }
    }
}
