use crate::form::{
    field::FieldDescriptor,
    validation::FieldErrors,
    values::{FormValue, FormValues},
};
use serde::{Deserialize, Serialize};

/// Live value/error bag backing an open form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FieldErrors,
}

impl FormState {
    /// Seeds a state from field defaults, overlaid with the initial values.
    ///
    /// Initial entries for names that are not fields are kept so that a
    /// record's hidden attributes survive an edit round trip.
    pub fn seeded(fields: &[FieldDescriptor], initial: Option<&FormValues>) -> Self {
        let mut values: FormValues = fields
            .iter()
            .map(|field| (field.name.clone(), field.initial_value()))
            .collect();

        if let Some(initial) = initial {
            for (name, value) in initial.iter() {
                values.insert(name.clone(), value.clone());
            }
        }

        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn value(&self, name: &str) -> Option<&FormValue> {
        self.values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Stores a new value and clears any error recorded for that field
    pub fn update(&mut self, name: &str, value: FormValue) {
        self.values.insert(name, value);
        self.errors.remove(name);
    }
}
