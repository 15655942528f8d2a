//! Error types
//!
//! Parsing never fails, so errors only come from three places: schema
//! contract violations, the record store, and per-document import failures
//! that wrap a store error with the offending path.

use thiserror::Error;

/// Schema contract violation
///
/// Every variant names the field, choice or view at fault.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("ver must be 1, found {0}")]
    UnsupportedVersion(u32),

    #[error("schema name is required")]
    MissingName,

    #[error("item_name is required")]
    MissingItemName,

    #[error("icon must start with ti-, found '{0}'")]
    InvalidIcon(String),

    #[error("field missing id")]
    MissingFieldId,

    #[error("duplicate field id: {0}")]
    DuplicateField(String),

    #[error("field {0} missing label")]
    MissingFieldLabel(String),

    #[error("choice field {0} missing choices")]
    MissingChoices(String),

    #[error("choice in {field} missing id")]
    MissingChoiceId { field: String },

    #[error("choice {choice} in {field} missing label")]
    MissingChoiceLabel { field: String, choice: String },

    #[error("choice {choice} in {field} has an empty color")]
    MissingChoiceColor { field: String, choice: String },

    #[error("view missing id")]
    MissingViewId,

    #[error("duplicate view id: {0}")]
    DuplicateView(String),

    #[error("view {0} missing label")]
    MissingViewLabel(String),

    #[error("view {view} references unknown field {field}")]
    UnknownViewField { view: String, field: String },

    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Record store failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {id}")]
    RecordNotFound { id: String },

    #[error("record store rejected the write: {0}")]
    Rejected(String),

    #[error("record store backend error: {0}")]
    Backend(String),
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Create a record-not-found error
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Create a rejected-write error
    pub fn rejected<S: Into<String>>(msg: S) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a generic backend error
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }
}

/// One document could not be imported
#[derive(Error, Debug, Clone)]
#[error("failed to import {path}: {source}")]
pub struct DocumentError {
    pub path: String,
    #[source]
    pub source: StoreError,
}

impl DocumentError {
    pub fn new(path: impl Into<String>, source: StoreError) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
