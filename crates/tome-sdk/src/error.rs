use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("blob store error: {0}")]
    Blob(#[from] tome_blob::BlobError),

    #[error("catalog error: {0}")]
    Catalog(#[from] tome_catalog::CatalogError),

    #[error("query error: {0}")]
    Query(#[from] tome_query::QueryError),

    #[error("type error: {0}")]
    Type(#[from] tome_types::TypeError),

    #[error("config error at {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("seed fixture invalid: {0}")]
    Fixture(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
