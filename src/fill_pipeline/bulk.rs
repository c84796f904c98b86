//! The bulk copy path: one typed slice copy per column, or nothing at all.

use arrow::array::{Array, PrimitiveArray};

use crate::config::IngestConfig;
use crate::error::TambakError;
use crate::kernels::copy_into;
use crate::source::BulkColumn;
use crate::table::{Column, ColumnData};
use crate::traits::FixedWidth;
use crate::types::TambakDataType;

/// Outcome of a bulk attempt. `Fail` is not an error; it routes the column to
/// the iterative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    Succeed,
    Fail,
}

/// Copies `bulk.array` into `column` starting at row 0 if the layouts provably match.
///
/// Preconditions checked before any element moves: bulk copy is enabled, the
/// source resolved to the column's dtype, that dtype is fixed-width, and the
/// array's physical type is the column's element type. Validity is left to
/// the caller.
pub fn try_bulk_copy(
    column: &mut Column,
    source_dtype: TambakDataType,
    bulk: &BulkColumn,
    config: &IngestConfig,
) -> Result<FillStatus, TambakError> {
    let dtype = column.dtype();
    if !config.enable_bulk_copy || source_dtype != dtype || !dtype.is_bulk_copyable() {
        return Ok(FillStatus::Fail);
    }

    let (data, _) = column.parts_mut();
    let array = bulk.array.as_ref();

    macro_rules! dispatch {
        ($($variant:ident => $T:ty),+ $(,)?) => {
            match dtype {
                $(TambakDataType::$variant => copy_typed::<$T>(data, array),)+
                _ => Ok(FillStatus::Fail),
            }
        };
    }

    dispatch!(
        Int8 => i8,
        Int16 => i16,
        Int32 => i32,
        Int64 => i64,
        UInt8 => u8,
        UInt16 => u16,
        UInt32 => u32,
        UInt64 => u64,
        Float32 => f32,
        Float64 => f64,
    )
}

fn copy_typed<T: FixedWidth>(data: &mut ColumnData, array: &dyn Array) -> Result<FillStatus, TambakError> {
    let Some(src) = array.as_any().downcast_ref::<PrimitiveArray<T::ArrowType>>() else {
        return Ok(FillStatus::Fail);
    };
    let Some(dst) = T::buffer_mut(data) else {
        return Ok(FillStatus::Fail);
    };
    copy_into::<T>(&src.values()[..], dst, 0)?;
    Ok(FillStatus::Succeed)
}
