// ⚠️ Error Taxonomy - every recoverable condition the stores can report
//
// Nothing in the library panics on bad input. Validation, lookups, ordinal
// selection and file handling all come back to the caller as a WarehouseError.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarehouseError {
    /// Malformed or out-of-range raw input
    #[error("Error: {field} {message}")]
    Validation { field: String, message: String },

    /// Registration number already present in the store
    #[error("Error: registration number {0} is already registered")]
    DuplicateKey(String),

    /// Lookup or filter produced nothing
    #[error("{0}")]
    NotFound(String),

    /// Ordinal selection outside the valid bounds
    #[error("Error: your choice {ordinal} must be between {min}-{max}")]
    OutOfRange { ordinal: usize, min: usize, max: usize },

    /// Data file could not be read or written
    #[error("Cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed persisted line; the load that hit it is abandoned.
    /// `origin` names the file, or `input` for a single line
    #[error("{origin}:{line}: {reason}")]
    Parse {
        origin: String,
        line: usize,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing a report to the terminal failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl WarehouseError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        WarehouseError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WarehouseError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, WarehouseError>;
