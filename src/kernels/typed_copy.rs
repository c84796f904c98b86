//! This module contains the pure, stateless kernel behind the bulk copy path.
//!
//! A whole-column transfer is expressed as `&[T] -> &mut [T]` for a single
//! `T: Pod`, so the source and destination layouts are identical by construction.
//! This module is PURE RUST and panic-free.

use bytemuck::Pod;

use crate::error::TambakError;

//==================================================================================
// 1. Public API
//==================================================================================

/// Copies every element of `src` into `dst` starting at element `offset`.
///
/// Bounds are checked before anything is written; on error `dst` is untouched.
/// Returns the number of elements copied.
pub fn copy_into<T: Pod>(src: &[T], dst: &mut [T], offset: usize) -> Result<usize, TambakError> {
    let end = offset
        .checked_add(src.len())
        .ok_or(TambakError::BufferMismatch(usize::MAX, dst.len()))?;
    if end > dst.len() {
        return Err(TambakError::BufferMismatch(end, dst.len()));
    }
    dst[offset..end].copy_from_slice(src);
    Ok(src.len())
}

/// The raw byte view of a typed slice, used to compare buffers bit-for-bit.
pub fn as_bytes<T: Pod>(values: &[T]) -> &[u8] {
    bytemuck::cast_slice(values)
}
