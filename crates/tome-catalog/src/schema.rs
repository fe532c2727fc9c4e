//! Declarative schema for book records.
//!
//! [`BOOK_SCHEMA`] is the single description of what a valid record looks
//! like; [`validate_draft`] walks it and accumulates every violation rather
//! than stopping at the first. Both backends validate through this module on
//! insert and again after every targeted update, so an edit can never leave
//! a stored record outside the schema.

use std::fmt;

use tome_types::{Author, BookDraft, FileType};

use crate::error::{CatalogError, CatalogResult};

/// The kind of constraint a field carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRequirement {
    /// Must be present and non-empty.
    RequiredString,
    /// Must name at least one author, each with a non-empty name.
    RequiredAuthors,
    /// Always present; entries, when any, must be non-empty.
    StringList,
    /// May be absent; when present, must be non-empty.
    OptionalString,
    /// Must be non-empty and end in a recognized document extension.
    DocumentFileName,
}

/// One field's entry in [`BOOK_SCHEMA`].
pub struct FieldSpec {
    /// Field name as stored and as reported in violations.
    pub name: &'static str,
    /// The constraint kind enforced for this field.
    pub requirement: FieldRequirement,
    check: fn(&BookDraft, &mut Vec<Violation>),
}

/// The enforced shape of a book record.
///
/// Every draft passes through this table before it is persisted.
pub const BOOK_SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        requirement: FieldRequirement::RequiredString,
        check: |draft, out| require_non_empty("title", &draft.title, out),
    },
    FieldSpec {
        name: "authors",
        requirement: FieldRequirement::RequiredAuthors,
        check: |draft, out| check_authors(&draft.authors, out),
    },
    FieldSpec {
        name: "language",
        requirement: FieldRequirement::RequiredString,
        check: |draft, out| require_non_empty("language", &draft.language, out),
    },
    FieldSpec {
        name: "isbn",
        requirement: FieldRequirement::RequiredString,
        check: |draft, out| require_non_empty("isbn", &draft.isbn, out),
    },
    FieldSpec {
        name: "genres",
        requirement: FieldRequirement::StringList,
        check: |draft, out| check_string_list("genres", &draft.genres, out),
    },
    FieldSpec {
        name: "sub_genres",
        requirement: FieldRequirement::StringList,
        check: |draft, out| check_string_list("sub_genres", &draft.sub_genres, out),
    },
    FieldSpec {
        name: "main_characters",
        requirement: FieldRequirement::StringList,
        check: |draft, out| check_string_list("main_characters", &draft.main_characters, out),
    },
    FieldSpec {
        name: "set_year",
        requirement: FieldRequirement::OptionalString,
        check: |draft, out| optional_non_empty("set_year", &draft.set_year, out),
    },
    FieldSpec {
        name: "set_main_location",
        requirement: FieldRequirement::OptionalString,
        check: |draft, out| optional_non_empty("set_main_location", &draft.set_main_location, out),
    },
    FieldSpec {
        name: "copyright",
        requirement: FieldRequirement::OptionalString,
        check: |draft, out| optional_non_empty("copyright", &draft.copyright, out),
    },
    FieldSpec {
        name: "file_name",
        requirement: FieldRequirement::DocumentFileName,
        check: |draft, out| check_file_name(&draft.file_name, out),
    },
];

/// A single schema violation: which field, and why it was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Path of the offending field, e.g. `title` or `authors[1].name`.
    pub field: String,
    /// Human-readable reason for the rejection.
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a draft against [`BOOK_SCHEMA`], collecting every violation.
///
/// An empty result means the draft is acceptable.
pub fn validate_draft(draft: &BookDraft) -> Vec<Violation> {
    let mut violations = Vec::new();
    for spec in BOOK_SCHEMA {
        (spec.check)(draft, &mut violations);
    }
    violations
}

/// Validate a draft, turning a non-empty violation list into an error.
pub fn ensure_valid(draft: &BookDraft) -> CatalogResult<()> {
    let violations = validate_draft(draft);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::SchemaViolation { violations })
    }
}

fn require_non_empty(field: &str, value: &str, out: &mut Vec<Violation>) {
    if value.trim().is_empty() {
        out.push(Violation::new(field, "must not be empty"));
    }
}

fn optional_non_empty(field: &str, value: &Option<String>, out: &mut Vec<Violation>) {
    if let Some(value) = value {
        if value.trim().is_empty() {
            out.push(Violation::new(field, "must not be empty when present"));
        }
    }
}

fn check_string_list(field: &str, items: &[String], out: &mut Vec<Violation>) {
    for (index, item) in items.iter().enumerate() {
        if item.trim().is_empty() {
            out.push(Violation::new(
                format!("{field}[{index}]"),
                "entries must not be empty",
            ));
        }
    }
}

fn check_authors(authors: &[Author], out: &mut Vec<Violation>) {
    if authors.is_empty() {
        out.push(Violation::new("authors", "at least one author is required"));
        return;
    }
    for (index, author) in authors.iter().enumerate() {
        if author.name.trim().is_empty() {
            out.push(Violation::new(
                format!("authors[{index}].name"),
                "must not be empty",
            ));
        }
        if let Some(pseudonym) = &author.pseudonym {
            if pseudonym.trim().is_empty() {
                out.push(Violation::new(
                    format!("authors[{index}].pseudonym"),
                    "must not be empty when present",
                ));
            }
        }
    }
}

fn check_file_name(file_name: &str, out: &mut Vec<Violation>) {
    if file_name.trim().is_empty() {
        out.push(Violation::new("file_name", "must not be empty"));
        return;
    }
    if FileType::from_file_name(file_name).is_err() {
        out.push(Violation::new(
            "file_name",
            "must end in a recognized document extension (.epub or .pdf)",
        ));
    }
}
