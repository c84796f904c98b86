//! This module serves as the public API for the collection of pure, stateless
//! element kernels used by the fill pipeline.
//!
//! Kernels never touch a `Table` or a source; they operate on slices and single
//! values, and report failure through `Option` or `TambakError`.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Whole-column typed transfer (bulk copy path).
pub mod typed_copy;

/// Exact narrowing of loosely-typed numeric values.
pub mod narrow;

/// Timestamp unit conversion.
pub mod rescale;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use narrow::{narrow_float, narrow_int, NumericCell};
pub use rescale::{days_to_millis, rescale, unit_to_millis, MILLIS_PER_DAY};
pub use typed_copy::copy_into;
