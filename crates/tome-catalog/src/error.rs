use std::path::PathBuf;

use tome_types::RecordId;

use crate::schema::Violation;

/// Errors from catalog repository operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The record shape failed schema validation. Carries every offending
    /// field, not just the first one found.
    #[error("schema violation: {}", format_violations(.violations))]
    SchemaViolation { violations: Vec<Violation> },

    /// No record exists with the requested ID.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// The record collection could not be created or confirmed present.
    #[error("catalog initialization failed at {}: {reason}", .path.display())]
    Initialization { path: PathBuf, reason: String },

    /// A list-field name that does not match any list-valued record field.
    #[error("unknown list field '{0}' (expected genres, sub-genres, or characters)")]
    UnknownListField(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
