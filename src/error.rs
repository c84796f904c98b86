// In: src/error.rs

//! This module defines the single, unified error type for the entire tambak ingestion core.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Only fatal conditions live here. Bulk-copy incompatibility, value overflow and
//! per-row nulls are handled inside the fill pipeline and never surface as errors.

use thiserror::Error;

use crate::types::TambakDataType;

#[derive(Error, Debug)]
pub enum TambakError {
    // =========================================================================
    // === Fatal Fill Errors (abort the whole `fill_table` call)
    // =========================================================================
    #[error("Cannot fill column '{column}' as it is not in the {location} schema")]
    SchemaError {
        column: String,
        location: &'static str,
    },

    #[error("Cannot fill column '{column}': unsupported container layout {layout}")]
    UnsupportedContainerError { column: String, layout: String },

    // =========================================================================
    // === Table & Column Errors
    // =========================================================================
    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Column '{0}' already exists in the table")]
    DuplicateColumn(String),

    #[error("Column '{column}' has type {actual}, but a {expected} value was written")]
    TypeMismatch {
        column: String,
        expected: TambakDataType,
        actual: TambakDataType,
    },

    #[error("Row {row} is out of bounds for a column of {len} rows")]
    RowOutOfBounds { row: usize, len: usize },

    #[error("No promotion path for column '{column}' from {from} to {to}")]
    UnsupportedPromotion {
        column: String,
        from: TambakDataType,
        to: TambakDataType,
    },

    #[error("Invalid ingestion configuration: {0}")]
    ConfigError(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    #[error("Buffer length mismatch: expected {0} elements, got {1}")]
    BufferMismatch(usize, usize),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while loading configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    FfiError(String),
}

impl TambakError {
    /// Builds a `SchemaError` for a column missing from the destination table.
    pub(crate) fn missing_in_table(column: &str) -> Self {
        TambakError::SchemaError {
            column: column.to_string(),
            location: "table",
        }
    }

    /// Builds a `SchemaError` for a column missing from the data source.
    pub(crate) fn missing_in_source(column: &str) -> Self {
        TambakError::SchemaError {
            column: column.to_string(),
            location: "source",
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for TambakError {
    fn from(err: pyo3::PyErr) -> Self {
        TambakError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<TambakError> for pyo3::PyErr {
    fn from(err: TambakError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
