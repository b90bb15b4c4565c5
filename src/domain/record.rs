use crate::{
    error::{ConsoleError, Result},
    form::{FieldDescriptor, FormValues},
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a console record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ConsoleError::InvalidRecordId(s.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single attribute of a record as seen by tables and filters
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns the calendar date held by this value.
    ///
    /// Text values in `YYYY-MM-DD` form are parsed, so records that keep
    /// dates as plain strings still take part in range filters.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Case-insensitive substring match against an already lowercased needle
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Self::Empty => false,
            Self::List(items) => items
                .iter()
                .any(|item| item.to_lowercase().contains(needle)),
            other => other.to_string().to_lowercase().contains(needle),
        }
    }

    /// Exact-match test used by table filters.
    ///
    /// A list matches when one of its items equals the filter text.
    pub fn matches_exact(&self, filter: &FieldValue) -> bool {
        match (self, filter) {
            (Self::List(items), Self::Text(wanted)) => items.iter().any(|item| item == wanted),
            (Self::Text(s), Self::Date(date)) | (Self::Date(date), Self::Text(s)) => {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok() == Some(*date)
            }
            (a, b) => a == b,
        }
    }

    /// Total ordering used for sorting.
    ///
    /// Text compares case-insensitively, numbers numerically, dates and
    /// times chronologically. Empty values order after everything else.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Greater,
            (_, Self::Empty) => Ordering::Less,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::List(a), Self::List(b)) => a.join(",").to_lowercase().cmp(&b.join(",").to_lowercase()),
            (Self::Date(a), Self::Text(_)) => other
                .as_date()
                .map(|b| a.cmp(&b))
                .unwrap_or(Ordering::Less),
            (Self::Text(_), Self::Date(b)) => self
                .as_date()
                .map(|a| a.cmp(b))
                .unwrap_or(Ordering::Greater),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Time(_) => 3,
            Self::Text(_) => 4,
            Self::List(_) => 5,
            Self::Empty => 6,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            Self::Number(n) => write!(f, "{}", n),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M")),
            Self::Text(s) => write!(f, "{}", s),
            Self::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

/// A domain entity held in a session repository and shown in tables
pub trait Record: Clone + Send + Sync + 'static {
    /// Name of the collection, used for fixture files and log output
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;

    /// Returns the value of a named attribute, or `FieldValue::Empty`
    fn field(&self, name: &str) -> FieldValue;
}

/// A record that is created and edited through a descriptor-driven form
pub trait FormRecord: Record + Sized {
    /// Descriptors for the record's edit form, in display order
    fn form_fields() -> Vec<FieldDescriptor>;

    /// Current values, used to seed an edit form
    fn to_form(&self) -> FormValues;

    /// Builds a record from submitted values
    fn from_form(id: RecordId, values: &FormValues) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_parsing() {
        let id = RecordId::new();
        let parsed = RecordId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert!(RecordId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_compare_numbers_numerically() {
        let nine = FieldValue::Number(9.0);
        let ten = FieldValue::Number(10.0);
        assert_eq!(nine.compare(&ten), Ordering::Less);

        // Lexically "10" < "9", which must not apply to numbers
        let nine = FieldValue::text("9");
        let ten = FieldValue::text("10");
        assert_eq!(nine.compare(&ten), Ordering::Greater);
    }

    #[test]
    fn test_compare_text_case_insensitive() {
        let a = FieldValue::text("apple");
        let b = FieldValue::text("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_empty_sorts_last() {
        let empty = FieldValue::Empty;
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(empty.compare(&date), Ordering::Greater);
        assert_eq!(date.compare(&empty), Ordering::Less);
        assert_eq!(empty.compare(&FieldValue::Empty), Ordering::Equal);
    }

    #[test]
    fn test_text_dates_are_parsed() {
        let value = FieldValue::text("2024-03-15");
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(FieldValue::text("March").as_date(), None);
    }

    #[test]
    fn test_matches_exact_list_membership() {
        let tags = FieldValue::List(vec!["vip".to_string(), "retail".to_string()]);
        assert!(tags.matches_exact(&FieldValue::text("vip")));
        assert!(!tags.matches_exact(&FieldValue::text("wholesale")));
    }

    #[test]
    fn test_contains_lowercase() {
        let value = FieldValue::text("Acme Corporation");
        assert!(value.contains_lowercase("corp"));
        assert!(!value.contains_lowercase("globex"));
        assert!(!FieldValue::Empty.contains_lowercase(""));
    }
}
