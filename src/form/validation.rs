use crate::form::{
    field::{FieldDescriptor, FieldType},
    values::{FormValue, FormValues},
};
use regex::Regex;
use std::{collections::BTreeMap, sync::OnceLock};

/// Field name to validation message
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Checks a value against the simple `text@text.text` shape
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

/// Validates a single field, returning its error message if any
pub fn validate_field(field: &FieldDescriptor, value: Option<&FormValue>) -> Option<String> {
    let blank = value.map(FormValue::is_blank).unwrap_or(true);

    if blank {
        // Disabled inputs cannot be filled in, so they never block a submit
        if field.required && !field.disabled {
            return Some(format!("{} is required.", field.label));
        }
        return None;
    }

    let value = value?;
    match field.field_type {
        FieldType::Email => match value.as_text() {
            Some(text) if is_valid_email(text) => None,
            _ => Some(format!("{} must be a valid email address.", field.label)),
        },
        FieldType::Number => match value.to_number() {
            Some(_) => None,
            None => Some(format!("{} must be a number.", field.label)),
        },
        // A select without options is filled in by the caller at render time
        FieldType::Select if !field.options.is_empty() => match value.as_text() {
            Some(text) if field.options.iter().any(|opt| opt.value == text.trim()) => None,
            _ => Some(format!("{} must be one of the listed options.", field.label)),
        },
        _ => None,
    }
}

/// Validates every field and collects all violations
pub fn validate(fields: &[FieldDescriptor], values: &FormValues) -> FieldErrors {
    fields
        .iter()
        .filter_map(|field| {
            validate_field(field, values.get(&field.name)).map(|msg| (field.name.clone(), msg))
        })
        .collect()
}
