//! Every failure the engine and its collaborators can report.
//!
//! The engine never prints anything on its own. A [`DbError`] travels back to
//! whoever invoked the operation and that caller decides how to present it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("table '{0}' already exists")]
    DuplicateTable(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("invalid column spec '{0}': expected <name>:<int|str|bool>")]
    InvalidSpec(String),

    #[error("column '{0}' is reserved; the ID column is created automatically")]
    ReservedName(String),

    #[error("expected {expected} value(s), got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("invalid value '{value}' for a column of type {datatype}")]
    InvalidValue { value: String, datatype: String },

    #[error("column '{0}' does not exist")]
    ColumnNotFound(String),

    #[error("table '{0}' has no IDs left to assign")]
    IdExhausted(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
