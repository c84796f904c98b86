//! This file is the root of the `tambak_ingest` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`fill_pipeline`,
//!     `table`, `bridge`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the types a caller needs to run a fill.
//! 3.  Defining the `#[pymodule]` (feature `python`) which acts as the entry
//!     point when the compiled library is imported into Python.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod error;
pub mod fill_pipeline;
pub mod kernels;
pub mod null_handling;
pub mod source;
pub mod table;
pub mod traits;
pub mod types;

mod ffi;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::IngestConfig;
pub use error::TambakError;
pub use fill_pipeline::{FillPath, FillReport, Loader, Promotion};
pub use null_handling::{NullPolicy, RowStatus};
pub use source::{BulkColumn, SourceAccessor};
pub use table::{Column, Schema, Table};
pub use types::{DateParts, Scalar, TambakDataType};

//==================================================================================
// 3. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `tambak_ingest` Python module.
#[cfg(feature = "python")]
#[pymodule]
fn tambak_ingest(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::python::PyTable>()?;

    // --- Expose the custom error type ---
    m.add(
        "TambakError",
        m.py().get_type_bound::<pyo3::exceptions::PyValueError>(),
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    // --- Turn on logging for fill path and promotion decisions ---
    m.add_function(wrap_pyfunction!(ffi::python::enable_verbose_logging_py, m)?)?;

    Ok(())
}
