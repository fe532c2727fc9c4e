//! Page geometry: the request and the resulting page.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// A 1-based page request with a caller-fixed page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub number: usize,
    /// Records per page; at least 1.
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// The first page at the given size.
    pub fn first(size: usize) -> Self {
        Self { number: 1, size }
    }

    /// Reject malformed geometry. Numbers and sizes start at 1; a zero is
    /// a caller bug and is never aliased to the first page.
    pub fn validate(&self) -> QueryResult<()> {
        if self.size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        if self.number == 0 {
            return Err(QueryError::ZeroPageNumber);
        }
        Ok(())
    }

    pub(crate) fn offset(&self) -> usize {
        (self.number - 1) * self.size
    }
}

/// One page of results plus the metadata a pager needs.
///
/// `total_count` always covers the whole filtered set; a page past the end
/// of the results is empty but carries the same counts as any other.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches across the whole filtered set, independent of paging.
    pub total_count: usize,
    pub page_number: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Total pages at this page size, by integer ceiling. Zero when the
    /// filtered set is empty.
    pub fn total_pages(&self) -> usize {
        (self.total_count + self.page_size - 1) / self.page_size
    }

    /// Whether a later page would hold any items.
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
