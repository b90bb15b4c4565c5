//! # Opsdesk Core
//!
//! Core business logic for the Opsdesk operations console.
//!
//! This crate provides the reusable pieces behind the console's pages:
//! descriptor-driven forms with validation, a table helper that searches,
//! filters, sorts and pages record collections, and a kanban board whose
//! cards always carry the name of the column holding them. Records live in
//! session-scoped repositories rather than global state, and nothing here
//! depends on a particular UI toolkit.

pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod kanban;
pub mod repository;
pub mod service;
pub mod session;
pub mod table;

// Re-export commonly used types
pub use config::{load_config, ConsoleConfig};
pub use domain::{
    record::{FieldValue, FormRecord, Record, RecordId},
    Asset, Customer, Lead, Quote, Shift, Task,
};
pub use error::{ConsoleError, Result};
pub use form::{FieldDescriptor, FieldType, FormModal, FormState, FormValue, FormValues, SubmitOutcome};
pub use kanban::{BoardConfig, CardMove, CardPosition, KanbanBoard, KanbanCard};
pub use repository::{Delayed, FixtureStore, MemoryRepository, Repository};
pub use service::RecordService;
pub use session::{Session, SessionRepository};
pub use table::{DateRange, Paging, SortKey, SortOrder, TablePage, TableQuery};
