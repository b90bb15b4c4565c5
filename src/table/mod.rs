//! Client-side table helpers: free-text search, exact and date-range
//! filters, stable sorting, pagination and date grouping.

pub mod group;
pub mod query;
pub mod view;

pub use group::{count_by, group_by_date, sum_of, DateBucket, DateGroup};
pub use query::{DateRange, Paging, SortKey, SortOrder, TableQuery};
pub use view::{apply, filter_records, page_count, sort_records, TablePage};
