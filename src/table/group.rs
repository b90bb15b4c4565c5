use crate::domain::record::{FieldValue, Record};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Calendar granularity for grouping rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBucket {
    Day,
    /// ISO week starting on Monday
    Week,
    Month,
}

impl DateBucket {
    /// First day of the bucket containing `date`
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Self::Day => start.format("%Y-%m-%d").to_string(),
            Self::Week => format!("Week of {}", start.format("%Y-%m-%d")),
            Self::Month => start.format("%B %Y").to_string(),
        }
    }
}

/// Rows sharing one date bucket; `start` is `None` for the undated group
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup<R> {
    pub start: Option<NaiveDate>,
    pub label: String,
    pub rows: Vec<R>,
}

/// Partitions rows into chronologically ordered date buckets.
///
/// Rows keep their input order inside a bucket. Rows without a readable
/// date on `field` are collected into a trailing "Undated" group.
pub fn group_by_date<R: Record>(records: &[R], field: &str, bucket: DateBucket) -> Vec<DateGroup<R>> {
    let mut dated: BTreeMap<NaiveDate, Vec<R>> = BTreeMap::new();
    let mut undated = Vec::new();

    for record in records {
        match record.field(field).as_date() {
            Some(date) => dated
                .entry(bucket.start_of(date))
                .or_default()
                .push(record.clone()),
            None => undated.push(record.clone()),
        }
    }

    let mut groups: Vec<DateGroup<R>> = dated
        .into_iter()
        .map(|(start, rows)| DateGroup {
            start: Some(start),
            label: bucket.label(start),
            rows,
        })
        .collect();

    if !undated.is_empty() {
        groups.push(DateGroup {
            start: None,
            label: "Undated".to_string(),
            rows: undated,
        });
    }
    groups
}

/// Counts rows per distinct display value of `field`, in first-seen order
pub fn count_by<R: Record>(records: &[R], field: &str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let key = record.field(field).to_string();
        match counts.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// Sums a numeric field, skipping rows where it is not a number
pub fn sum_of<R: Record>(records: &[R], field: &str) -> f64 {
    records
        .iter()
        .filter_map(|record| match record.field(field) {
            FieldValue::Number(n) => Some(n),
            _ => None,
        })
        .sum()
}
