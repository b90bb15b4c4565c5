use crate::{
    domain::record::FieldValue,
    error::{ConsoleError, Result},
};
use chrono::NaiveDate;
use std::str::FromStr;

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(ConsoleError::InvalidQuery(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            ))),
        }
    }
}

/// Field and direction to order rows by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Descending)
    }
}

/// Inclusive date window over a named date field; open ends are unbounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub field: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(
        field: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(ConsoleError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(Self {
            field: field.into(),
            from,
            to,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Page window; `page` is zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    page_size: usize,
    page: usize,
}

impl Paging {
    pub fn new(page_size: usize, page: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ConsoleError::InvalidQuery(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page_size, page })
    }

    /// First page of the given size
    pub fn first(page_size: usize) -> Result<Self> {
        Self::new(page_size, 0)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Same page size, another page
    pub fn at(self, page: usize) -> Self {
        Self { page, ..self }
    }
}

/// Criteria for one table view: search, filters, date range, sort and page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub filters: Vec<(String, FieldValue)>,
    pub date_range: Option<DateRange>,
    pub sort: Option<SortKey>,
    pub paging: Option<Paging>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text search over the given fields; blank text disables search
    pub fn search<I, S>(mut self, text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into();
        self.search = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Same criteria pointed at another page
    pub fn with_page(&self, page: usize) -> Self {
        let mut next = self.clone();
        next.paging = next.paging.map(|paging| paging.at(page));
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::from_str("asc").unwrap(), SortOrder::Ascending);
        assert_eq!(SortOrder::from_str("DESC").unwrap(), SortOrder::Descending);
        assert!(SortOrder::from_str("sideways").is_err());
    }

    #[test]
    fn test_date_range_inclusive() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange::new("date", Some(jan1), Some(jan31)).unwrap();

        assert!(range.contains(jan1));
        assert!(range.contains(jan31));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn test_date_range_open_end() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let range = DateRange::new("date", Some(jan1), None).unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb1 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(DateRange::new("date", Some(feb1), Some(jan1)).is_err());
    }

    #[test]
    fn test_paging_rejects_zero_size() {
        assert!(Paging::new(0, 0).is_err());
        assert!(Paging::first(0).is_err());

        let paging = Paging::new(10, 3).unwrap();
        assert_eq!(paging.page_size(), 10);
        assert_eq!(paging.page(), 3);
        assert_eq!(paging.at(1).page(), 1);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = TableQuery::new().search("   ", ["name"]);
        assert!(query.search.is_none());
    }
}
