//! This module serves as the public API for all null-handling logic within the
//! tambak ingestion core.
//!
//! Validity is always explicit: a bitmap per column plus the source's null-row
//! index set. No value inside a data buffer is ever interpreted as "null".

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// The per-column validity bitmap and the insert/update null policies.
pub mod bitmap;

/// Post-bulk-copy application of a source's null index set.
pub mod reconcile;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bitmap::{NullPolicy, RowStatus, ValidityBitmap};
pub use reconcile::apply_null_indices;

//==================================================================================
// 3. Unit Tests (Module-level integration tests)
//==================================================================================
