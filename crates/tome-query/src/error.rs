/// Errors from query and pagination.
///
/// An empty result set is never an error; these cover malformed requests
/// only.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Page sizes start at 1.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// Page numbers start at 1; zero is never aliased to the first page.
    #[error("page numbers start at 1")]
    ZeroPageNumber,

    /// A search-field name that does not match any searchable field.
    #[error(
        "unknown search field '{0}' (expected one of: title, author, language, \
         isbn, genre, sub-genre, character, set-year, location, file-name)"
    )]
    UnknownField(String),
}

/// Result alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
