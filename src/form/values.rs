use crate::error::{ConsoleError, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value held by one form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FormValue {
    /// Blank means nothing was entered: whitespace-only text or an empty list
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric reading of the value; text is parsed after trimming
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Self::List(_) => None,
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<NaiveDate> for FormValue {
    fn from(value: NaiveDate) -> Self {
        Self::Text(value.format(FormValues::DATE_FORMAT).to_string())
    }
}

impl From<NaiveTime> for FormValue {
    fn from(value: NaiveTime) -> Self {
        Self::Text(value.format(FormValues::TIME_FORMAT).to_string())
    }
}

/// Flat key-value bag emitted by a submitted form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FormValue>);

impl FormValues {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";
    pub const TIME_FORMAT: &'static str = "%H:%M";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`FormValues::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormValue)> {
        self.0.iter()
    }

    /// Trimmed text of a field, `None` when missing or blank
    pub fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name) {
            Some(FormValue::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(FormValue::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn require_text(&self, name: &str) -> Result<String> {
        self.text(name).ok_or_else(|| invalid(name, "value is required"))
    }

    pub fn number(&self, name: &str) -> Result<Option<f64>> {
        match self.0.get(name) {
            None => Ok(None),
            Some(value) if value.is_blank() => Ok(None),
            Some(value) => value
                .to_number()
                .map(Some)
                .ok_or_else(|| invalid(name, "not a number")),
        }
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>> {
        match self.text(name) {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(&s, Self::DATE_FORMAT)
                .map(Some)
                .map_err(|_| invalid(name, "expected a date as YYYY-MM-DD")),
        }
    }

    pub fn time(&self, name: &str) -> Result<Option<NaiveTime>> {
        match self.text(name) {
            None => Ok(None),
            Some(s) => NaiveTime::parse_from_str(&s, Self::TIME_FORMAT)
                .map(Some)
                .map_err(|_| invalid(name, "expected a time as HH:MM")),
        }
    }

    /// List items of a field; a single text value becomes a one-item list
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.0.get(name) {
            Some(FormValue::List(items)) => items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            Some(FormValue::Text(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }
}

impl FromIterator<(String, FormValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, FormValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn invalid(field: &str, reason: &str) -> ConsoleError {
    ConsoleError::InvalidFieldValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values() {
        assert!(FormValue::from("   ").is_blank());
        assert!(FormValue::List(vec![]).is_blank());
        assert!(!FormValue::Number(0.0).is_blank());
        assert!(!FormValue::from("x").is_blank());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(FormValue::from(" 12.5 ").to_number(), Some(12.5));
        assert_eq!(FormValue::from("12abc").to_number(), None);
        assert_eq!(FormValue::from("NaN").to_number(), None);
        assert_eq!(FormValue::Number(3.0).to_number(), Some(3.0));
    }

    #[test]
    fn test_typed_accessors() {
        let values = FormValues::new()
            .with("name", "  Ada ")
            .with("amount", "42")
            .with("due", "2024-05-01")
            .with("start", "09:30")
            .with("tags", vec!["a".to_string(), " ".to_string(), "b".to_string()]);

        assert_eq!(values.text("name").as_deref(), Some("Ada"));
        assert_eq!(values.number("amount").unwrap(), Some(42.0));
        assert_eq!(
            values.date("due").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(
            values.time("start").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(values.list("tags"), vec!["a", "b"]);
        assert_eq!(values.number("missing").unwrap(), None);
    }

    #[test]
    fn test_typed_accessor_errors() {
        let values = FormValues::new().with("amount", "lots").with("due", "tomorrow");

        assert!(values.number("amount").is_err());
        assert!(values.date("due").is_err());
        assert!(values.require_text("missing").is_err());
    }

    #[test]
    fn test_untagged_serialization() {
        let values = FormValues::new()
            .with("qty", 3.0)
            .with("name", "Widget")
            .with("tags", vec!["x".to_string()]);

        let json = serde_json::to_string(&values).unwrap();
        let back: FormValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
        assert_eq!(back.get("qty"), Some(&FormValue::Number(3.0)));
    }
}
