use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Record already exists: {0}")]
    DuplicateRecord(String),

    #[error("Invalid record ID format: {0}")]
    InvalidRecordId(String),

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Field is disabled: {0}")]
    DisabledField(String),

    #[error("Form is not open")]
    FormClosed,

    #[error("Invalid value for field {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Unknown kanban column: {0}")]
    UnknownColumn(String),

    #[error("Position {index} is out of range for column {column} (len {len})")]
    PositionOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid date range from {start} to {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
