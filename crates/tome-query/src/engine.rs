//! The staged query pipeline.

use tome_types::BookRecord;

use crate::error::QueryResult;
use crate::filter::QueryFilter;
use crate::page::{Page, PageRequest};

/// Run one query over a snapshot of records.
///
/// Stage order is fixed: apply the field predicate and type facet, count
/// the whole filtered set, then slice the requested page. Counting happens
/// before slicing, so `total_count` never depends on which page was asked
/// for.
///
/// A request past the last page yields a well-formed empty page (no
/// clamping); zero page geometry is rejected before any work is done.
pub fn run_query(
    records: &[BookRecord],
    filter: &QueryFilter,
    page: &PageRequest,
) -> QueryResult<Page<BookRecord>> {
    page.validate()?;

    let filtered: Vec<&BookRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    let total_count = filtered.len();
    let items: Vec<BookRecord> = filtered
        .into_iter()
        .skip(page.offset())
        .take(page.size)
        .cloned()
        .collect();

    Ok(Page {
        items,
        total_count,
        page_number: page.number,
        page_size: page.size,
    })
}
