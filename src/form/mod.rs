//! Descriptor-driven forms: field descriptions, live state, validation and
//! the modal that ties them together.

pub mod field;
pub mod modal;
pub mod state;
pub mod validation;
pub mod values;

pub use field::{FieldDescriptor, FieldType, SelectOption};
pub use modal::{FormModal, SubmitOutcome};
pub use state::FormState;
pub use validation::{validate, FieldErrors};
pub use values::{FormValue, FormValues};
