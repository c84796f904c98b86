// In: src/source/mod.rs

//! The capability contract every external data source implements.
//!
//! The fill pipeline never looks inside a source beyond this trait: it asks for
//! a whole column (a native Arrow array plus the rows the source considers null)
//! or for a single converted element.

use arrow::array::{Array, ArrayRef};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use bitvec::prelude::*;

use crate::error::TambakError;
use crate::types::{Scalar, TambakDataType};

/// A whole column as delivered by a source.
#[derive(Debug, Clone)]
pub struct BulkColumn {
    /// The column in its native representation.
    pub array: ArrayRef,
    /// Rows the source marks null, in ascending order.
    pub null_indices: Vec<usize>,
}

impl BulkColumn {
    /// A `len`-bit mask with a 1 for every row in `null_indices`.
    pub fn null_mask(&self, len: usize) -> BitVec {
        let mut mask = BitVec::repeat(false, len);
        for &row in &self.null_indices {
            if row < len {
                mask.set(row, true);
            }
        }
        mask
    }
}

/// Replaces a dictionary-encoded array with its decoded values. Other layouts
/// are returned unchanged.
pub fn decode_dictionary(array: &ArrayRef) -> Result<ArrayRef, TambakError> {
    match array.data_type() {
        DataType::Dictionary(_, value_type) => Ok(cast(array.as_ref(), value_type)?),
        _ => Ok(array.clone()),
    }
}

/// Whether `row` is logically null. A `Null`-typed array has no null buffer
/// but every row is null.
pub fn is_null_at(array: &dyn Array, row: usize) -> bool {
    match array.data_type() {
        DataType::Null => true,
        _ => array
            .logical_nulls()
            .map_or(false, |nulls| nulls.is_null(row)),
    }
}

pub trait SourceAccessor {
    /// Number of rows every column of this source has.
    fn row_count(&self) -> usize;

    /// Ordered `(name, native type)` pairs.
    fn schema(&self) -> Vec<(String, DataType)>;

    fn column_names(&self) -> Vec<String> {
        self.schema().into_iter().map(|(name, _)| name).collect()
    }

    /// Retrieves the named column. `dtype` is the destination dtype the caller
    /// is filling; a source may use it to pick a representation, but is free to
    /// return its native array.
    fn bulk_column(&self, name: &str, dtype: TambakDataType) -> Result<BulkColumn, TambakError>;

    /// Converts one element to a scalar of `dtype`. `Ok(None)` means the element
    /// is null or has no representation under `dtype`.
    fn marshal(
        &self,
        column_index: usize,
        row: usize,
        dtype: TambakDataType,
    ) -> Result<Option<Scalar>, TambakError>;
}
