use crate::{
    error::{ConsoleError, Result},
    form::{
        field::FieldDescriptor,
        state::FormState,
        validation::{self, FieldErrors},
        values::{FormValue, FormValues},
    },
};
use std::{fmt, sync::Arc};
use tracing::debug;

type ChangeCallback = Box<dyn FnMut(&str, &FormValue) + Send>;

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Values were handed to the submit callback and the form closed
    Submitted,
    /// Validation failed; the errors are also kept on the form state
    Rejected(FieldErrors),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// A modal form rendered from a list of field descriptors.
///
/// The modal owns no data beyond its own [`FormState`]; everything it
/// produces leaves through the change and submit callbacks.
pub struct FormModal {
    title: String,
    fields: Vec<FieldDescriptor>,
    open: bool,
    state: FormState,
    initial: Option<Arc<FormValues>>,
    on_change: Option<ChangeCallback>,
}

impl FormModal {
    pub fn new(title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: title.into(),
            fields,
            open: false,
            state: FormState::default(),
            initial: None,
            on_change: None,
        }
    }

    /// Registers a callback fired after every accepted field edit
    pub fn on_change(mut self, callback: impl FnMut(&str, &FormValue) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn value(&self, name: &str) -> Option<&FormValue> {
        self.state.value(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.error(name)
    }

    /// Opens the form, seeding its state from defaults and `initial`
    pub fn open(&mut self, initial: Option<Arc<FormValues>>) {
        self.state = FormState::seeded(&self.fields, initial.as_deref());
        self.initial = initial;
        self.open = true;
    }

    /// Hands the form a possibly new initial map.
    ///
    /// The state is re-seeded only when the map is a different allocation
    /// *and* its content differs, so re-renders that rebuild an equal map do
    /// not wipe in-progress edits. Returns whether a re-seed happened.
    pub fn set_initial(&mut self, initial: Option<Arc<FormValues>>) -> bool {
        let same_reference = match (&self.initial, &initial) {
            (None, None) => true,
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            _ => false,
        };
        if same_reference {
            return false;
        }

        let content_differs = self.initial.as_deref() != initial.as_deref();
        self.initial = initial;

        if self.open && content_differs {
            self.state = FormState::seeded(&self.fields, self.initial.as_deref());
            return true;
        }
        false
    }

    /// Records an edit to one field and clears that field's error
    pub fn set_value(&mut self, name: &str, value: impl Into<FormValue>) -> Result<()> {
        if !self.open {
            return Err(ConsoleError::FormClosed);
        }
        let field = self
            .field(name)
            .ok_or_else(|| ConsoleError::UnknownField(name.to_string()))?;
        if field.disabled {
            return Err(ConsoleError::DisabledField(name.to_string()));
        }

        let value = value.into();
        self.state.update(name, value.clone());
        if let Some(callback) = self.on_change.as_mut() {
            callback(name, &value);
        }
        Ok(())
    }

    /// Attaches an error to a field, e.g. one reported by a record builder
    pub fn set_error(&mut self, name: &str, message: impl Into<String>) {
        self.state.errors.insert(name.to_string(), message.into());
    }

    /// Validates the current values without closing the form.
    ///
    /// Returns the values when every field passes; otherwise stores the
    /// collected errors and returns `None`.
    pub fn prepare_submit(&mut self) -> Result<Option<FormValues>> {
        if !self.open {
            return Err(ConsoleError::FormClosed);
        }

        let errors = validation::validate(&self.fields, &self.state.values);
        if errors.is_empty() {
            self.state.errors.clear();
            Ok(Some(self.state.values.clone()))
        } else {
            debug!(form = %self.title, errors = errors.len(), "Form submission rejected");
            self.state.errors = errors;
            Ok(None)
        }
    }

    /// Validates and, on success, passes the values to `on_submit` and closes
    pub fn submit(&mut self, on_submit: impl FnOnce(FormValues)) -> Result<SubmitOutcome> {
        match self.prepare_submit()? {
            Some(values) => {
                on_submit(values);
                self.close();
                Ok(SubmitOutcome::Submitted)
            }
            None => Ok(SubmitOutcome::Rejected(self.state.errors.clone())),
        }
    }

    /// Closes the form and discards its state
    pub fn close(&mut self) {
        self.open = false;
        self.state = FormState::default();
    }
}

impl fmt::Debug for FormModal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormModal")
            .field("title", &self.title)
            .field("fields", &self.fields.len())
            .field("open", &self.open)
            .field("state", &self.state)
            .finish()
    }
}
