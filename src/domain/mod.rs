pub mod crm;
pub mod hr;
pub mod inventory;
pub mod project;
pub mod record;

pub use crm::{Customer, Lead, Quote};
pub use hr::Shift;
pub use inventory::Asset;
pub use project::{ChecklistItem, Priority, Task};
pub use record::{FieldValue, FormRecord, Record, RecordId};
