//! Applies a source's explicit null-row-index set to a freshly bulk-copied column.

use super::bitmap::{NullPolicy, ValidityBitmap};
use crate::error::TambakError;

/// Marks every row valid, then marks each index in `null_indices` null under `policy`.
///
/// Indices are validated before anything is written, so an out-of-range index
/// leaves the bitmap untouched. Returns the number of rows marked null
/// (duplicates counted once per occurrence in the input).
pub fn apply_null_indices(
    validity: &mut ValidityBitmap,
    null_indices: &[usize],
    policy: NullPolicy,
) -> Result<usize, TambakError> {
    let len = validity.len();
    if let Some(&row) = null_indices.iter().find(|&&row| row >= len) {
        return Err(TambakError::RowOutOfBounds { row, len });
    }

    validity.fill_valid();
    for &row in null_indices {
        validity.mark_null(row, policy);
    }
    Ok(null_indices.len())
}
