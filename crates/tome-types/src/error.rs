use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unrecognized document extension in file name: {0}")]
    UnrecognizedExtension(String),

    #[error("unknown file type label: {0} (expected \"epub\" or \"pdf\")")]
    UnknownFileType(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
