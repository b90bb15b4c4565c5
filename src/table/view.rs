use crate::{
    domain::record::Record,
    error::{ConsoleError, Result},
    table::query::{SortKey, SortOrder, TableQuery},
};

/// One page of a filtered and sorted table
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<R> {
    pub rows: Vec<R>,
    /// Number of records that passed the filters, across all pages
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

impl<R> TablePage<R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0 && self.page_count > 0
    }
}

/// Number of pages needed to show `total` rows, `ceil(total / page_size)`
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Whether a record passes the search, exact filters and date range
pub fn matches<R: Record>(record: &R, query: &TableQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.trim().to_lowercase();
        let hit = query
            .search_fields
            .iter()
            .any(|field| record.field(field).contains_lowercase(&needle));
        if !hit {
            return false;
        }
    }

    let filters_pass = query
        .filters
        .iter()
        .all(|(field, wanted)| record.field(field).matches_exact(wanted));
    if !filters_pass {
        return false;
    }

    match &query.date_range {
        Some(range) => record
            .field(&range.field)
            .as_date()
            .map(|date| range.contains(date))
            .unwrap_or(false),
        None => true,
    }
}

/// Returns the records passing the query's filters, in original order
pub fn filter_records<R: Record>(records: &[R], query: &TableQuery) -> Vec<R> {
    records
        .iter()
        .filter(|record| matches(*record, query))
        .cloned()
        .collect()
}

/// Sorts records in place.
///
/// The sort is stable: records with equal keys keep their relative order
/// in either direction.
pub fn sort_records<R: Record>(records: &mut [R], key: &SortKey) {
    records.sort_by(|a, b| {
        let cmp = a.field(&key.field).compare(&b.field(&key.field));
        match key.order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Runs a full table query: filter, sort, then slice out the page
pub fn apply<R: Record>(records: &[R], query: &TableQuery) -> Result<TablePage<R>> {
    let mut rows = filter_records(records, query);
    if let Some(key) = &query.sort {
        sort_records(&mut rows, key);
    }

    let total = rows.len();
    let Some(paging) = query.paging else {
        return Ok(TablePage {
            rows,
            total,
            page: 0,
            page_count: usize::from(total > 0),
        });
    };

    let page_size = paging.page_size();
    if page_size == 0 {
        return Err(ConsoleError::InvalidQuery(
            "page size must be at least 1".to_string(),
        ));
    }
    let pages = page_count(total, page_size);
    let start = paging.page().saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    let rows = rows.drain(start..end).collect();

    Ok(TablePage {
        rows,
        total,
        page: paging.page(),
        page_count: pages,
    })
}
