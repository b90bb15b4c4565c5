use crate::form::values::FormValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of input a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Time,
    Select,
    Textarea,
    Custom,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label doubles as its value
    pub fn same(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
        }
    }
}

/// Declarative description of one form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Name of the front-end component rendering a `custom` field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FormValue>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            disabled: false,
            options: Vec::new(),
            icon: None,
            placeholder: None,
            component: None,
            default: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Text)
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Email)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Number)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Date)
    }

    pub fn time(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Time)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Textarea)
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> Self {
        let mut field = Self::new(name, label, FieldType::Select);
        field.options = options.into_iter().collect();
        field
    }

    pub fn custom(
        name: impl Into<String>,
        label: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        let mut field = Self::new(name, label, FieldType::Custom);
        field.component = Some(component.into());
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<FormValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The value a freshly opened form shows for this field
    pub fn initial_value(&self) -> FormValue {
        self.default
            .clone()
            .unwrap_or_else(|| FormValue::Text(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let field = FieldDescriptor::email("email", "Email")
            .required()
            .with_icon("mail")
            .with_placeholder("name@example.com");

        assert_eq!(field.field_type, FieldType::Email);
        assert!(field.required);
        assert!(!field.disabled);
        assert_eq!(field.icon.as_deref(), Some("mail"));
    }

    #[test]
    fn test_descriptor_deserializes_from_json() {
        let json = r#"{
            "name": "priority",
            "label": "Priority",
            "type": "select",
            "required": true,
            "options": [
                {"label": "High", "value": "high"},
                {"label": "Low", "value": "low"}
            ]
        }"#;

        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Select);
        assert_eq!(field.options.len(), 2);
        assert!(!field.disabled);
        assert!(field.default.is_none());
    }

    #[test]
    fn test_initial_value_uses_default() {
        let field = FieldDescriptor::number("tax", "Tax").with_default(15.0);
        assert_eq!(field.initial_value(), FormValue::Number(15.0));

        let field = FieldDescriptor::text("name", "Name");
        assert_eq!(field.initial_value(), FormValue::Text(String::new()));
    }
}
