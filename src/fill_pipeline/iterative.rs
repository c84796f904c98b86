//! The per-row fallback path.
//!
//! One outer loop walks the rows of a column and dispatches each row on the
//! column's *current* dtype. A promotion re-binds the column and retries the same
//! row, so the rest of the column continues under the new dtype's dispatch.

use arrow::array::{
    Array, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array, Int16Array,
    Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType, TimeUnit};

use super::promote::promote;
use super::report::FillReport;
use super::FillContext;
use crate::error::TambakError;
use crate::kernels::{days_to_millis, narrow_float, narrow_int, rescale, unit_to_millis, NumericCell};
use crate::source::{decode_dictionary, is_null_at, BulkColumn, SourceAccessor};
use crate::table::{Column, Table};
use crate::traits::FixedWidth;
use crate::types::{Scalar, TambakDataType};

/// What happened to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStep {
    Stored,
    Null,
    Promote(TambakDataType),
}

/// Fills table column `idx` row by row from source column `src_idx`.
pub(crate) fn fill_iterative<S: SourceAccessor + ?Sized>(
    table: &mut Table,
    idx: usize,
    source: &S,
    src_idx: usize,
    bulk: &BulkColumn,
    ctx: &FillContext<'_>,
    report: &mut FillReport,
) -> Result<(), TambakError> {
    let rows = source.row_count().min(table.size());
    let nulls = bulk.null_mask(rows);
    let decoded = decode_dictionary(&bulk.array)?;
    let array = decoded.as_ref();

    let mut row = 0;
    while row < rows {
        let column = table.column_mut(idx)?;
        if nulls[row] {
            column.mark_null(row, ctx.policy)?;
            row += 1;
            continue;
        }

        let step = match column.dtype() {
            dtype if dtype.is_numeric() => numeric_row(column, row, numeric_cell(array, row))?,
            TambakDataType::Time => time_row(column, row, array, source, src_idx, ctx)?,
            TambakDataType::Date => date_row(column, row, source, src_idx)?,
            TambakDataType::String => string_row(column, row, source, src_idx)?,
            TambakDataType::Boolean => bool_row(column, row, source, src_idx)?,
            other => {
                return Err(TambakError::InternalError(format!(
                    "No iterative dispatch for dtype {}",
                    other
                )))
            }
        };

        match step {
            RowStep::Stored => row += 1,
            RowStep::Null => {
                column.mark_null(row, ctx.policy)?;
                row += 1;
            }
            RowStep::Promote(to) => promote(table, idx, to, row, report)?,
        }
    }
    Ok(())
}

//==================================================================================
// 1. Numeric Dispatch
//==================================================================================

fn numeric_row(column: &mut Column, row: usize, cell: NumericCell) -> Result<RowStep, TambakError> {
    let dtype = column.dtype();
    match cell {
        NumericCell::Null => return Ok(RowStep::Null),
        NumericCell::NonNumeric
            if matches!(dtype, TambakDataType::Int64 | TambakDataType::Float64) =>
        {
            return Ok(RowStep::Promote(TambakDataType::String))
        }
        _ => {}
    }

    let stored = match dtype {
        TambakDataType::Int8 => store(column, row, narrow_int::<i8>(cell))?,
        TambakDataType::Int16 => store(column, row, narrow_int::<i16>(cell))?,
        TambakDataType::Int32 => store(column, row, narrow_int::<i32>(cell))?,
        TambakDataType::Int64 => store(column, row, narrow_int::<i64>(cell))?,
        TambakDataType::UInt8 => store(column, row, narrow_int::<u8>(cell))?,
        TambakDataType::UInt16 => store(column, row, narrow_int::<u16>(cell))?,
        TambakDataType::UInt32 => store(column, row, narrow_int::<u32>(cell))?,
        TambakDataType::UInt64 => store(column, row, narrow_int::<u64>(cell))?,
        TambakDataType::Float32 => store(column, row, narrow_float::<f32>(cell))?,
        TambakDataType::Float64 => store(column, row, narrow_float::<f64>(cell))?,
        _ => false,
    };

    if stored {
        Ok(RowStep::Stored)
    } else if dtype == TambakDataType::Int32 && cell != NumericCell::NonNumeric {
        Ok(RowStep::Promote(TambakDataType::Float64))
    } else {
        log::warn!(
            "Column '{}': row {} value {:?} does not fit {}, storing null",
            column.name(),
            row,
            cell,
            dtype
        );
        Ok(RowStep::Null)
    }
}

fn store<T: FixedWidth>(column: &mut Column, row: usize, value: Option<T>) -> Result<bool, TambakError> {
    match value {
        Some(v) => {
            column.set_nth(row, v)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Reads one element of a native array as a numeric cell. Dictionary arrays
/// must be decoded first.
pub(crate) fn numeric_cell(array: &dyn Array, row: usize) -> NumericCell {
    if row >= array.len() || is_null_at(array, row) {
        return NumericCell::Null;
    }

    macro_rules! read {
        ($A:ty, $wrap:expr) => {
            match array.as_any().downcast_ref::<$A>() {
                Some(a) => $wrap(a.value(row)),
                None => NumericCell::NonNumeric,
            }
        };
    }

    match array.data_type() {
        DataType::Int8 => read!(Int8Array, |v: i8| NumericCell::Int(i64::from(v))),
        DataType::Int16 => read!(Int16Array, |v: i16| NumericCell::Int(i64::from(v))),
        DataType::Int32 => read!(Int32Array, |v: i32| NumericCell::Int(i64::from(v))),
        DataType::Int64 => read!(Int64Array, NumericCell::Int),
        DataType::UInt8 => read!(UInt8Array, |v: u8| NumericCell::UInt(u64::from(v))),
        DataType::UInt16 => read!(UInt16Array, |v: u16| NumericCell::UInt(u64::from(v))),
        DataType::UInt32 => read!(UInt32Array, |v: u32| NumericCell::UInt(u64::from(v))),
        DataType::UInt64 => read!(UInt64Array, NumericCell::UInt),
        DataType::Float32 => read!(Float32Array, |v: f32| NumericCell::from_f64(f64::from(v))),
        DataType::Float64 => read!(Float64Array, NumericCell::from_f64),
        DataType::Boolean => read!(BooleanArray, |v: bool| NumericCell::Int(i64::from(v))),
        DataType::Utf8 => read!(StringArray, NumericCell::parse),
        DataType::LargeUtf8 => read!(LargeStringArray, NumericCell::parse),
        _ => NumericCell::NonNumeric,
    }
}

//==================================================================================
// 2. Temporal Dispatch
//==================================================================================

fn time_row<S: SourceAccessor + ?Sized>(
    column: &mut Column,
    row: usize,
    array: &dyn Array,
    source: &S,
    src_idx: usize,
    ctx: &FillContext<'_>,
) -> Result<RowStep, TambakError> {
    let millis = match native_millis(array, row, ctx.config.time_scale_factor) {
        Some(millis) => millis,
        None => match source.marshal(src_idx, row, TambakDataType::Time)? {
            Some(Scalar::Time(ms)) => Some(ms),
            Some(other) => {
                log::warn!(
                    "Column '{}': row {} marshalled as {} instead of a time, storing null",
                    column.name(),
                    row,
                    other.dtype()
                );
                None
            }
            None => None,
        },
    };

    match millis {
        Some(ms) => {
            column.set_time(row, ms)?;
            Ok(RowStep::Stored)
        }
        None => Ok(RowStep::Null),
    }
}

/// Milliseconds for arrays whose layout already carries a timestamp.
///
/// The outer `None` means the layout is not natively temporal and the caller
/// should marshal; an inner `None` means the value overflowed.
fn native_millis(array: &dyn Array, row: usize, factor: i64) -> Option<Option<i64>> {
    macro_rules! value_of {
        ($A:ty) => {
            array.as_any().downcast_ref::<$A>()?.value(row)
        };
    }

    let millis = match array.data_type() {
        DataType::Int64 => rescale(value_of!(Int64Array), factor),
        DataType::Int32 => rescale(i64::from(value_of!(Int32Array)), factor),
        DataType::Timestamp(unit, _) => {
            let raw = match unit {
                TimeUnit::Second => value_of!(TimestampSecondArray),
                TimeUnit::Millisecond => value_of!(TimestampMillisecondArray),
                TimeUnit::Microsecond => value_of!(TimestampMicrosecondArray),
                TimeUnit::Nanosecond => value_of!(TimestampNanosecondArray),
            };
            unit_to_millis(raw, unit)
        }
        DataType::Date64 => Some(value_of!(Date64Array)),
        DataType::Date32 => Some(days_to_millis(value_of!(Date32Array))),
        _ => return None,
    };
    if millis.is_none() {
        log::warn!("Row {} timestamp overflows milliseconds, storing null", row);
    }
    Some(millis)
}

fn date_row<S: SourceAccessor + ?Sized>(
    column: &mut Column,
    row: usize,
    source: &S,
    src_idx: usize,
) -> Result<RowStep, TambakError> {
    match source.marshal(src_idx, row, TambakDataType::Date)? {
        Some(Scalar::Date(parts)) => match parts.to_naive_date() {
            Some(date) => {
                column.set_date(row, date)?;
                Ok(RowStep::Stored)
            }
            None => {
                log::warn!(
                    "Column '{}': row {} has invalid date {}, storing null",
                    column.name(),
                    row,
                    parts
                );
                Ok(RowStep::Null)
            }
        },
        Some(other) => {
            log::warn!(
                "Column '{}': row {} marshalled as {} instead of a date, storing null",
                column.name(),
                row,
                other.dtype()
            );
            Ok(RowStep::Null)
        }
        None => Ok(RowStep::Null),
    }
}

//==================================================================================
// 3. Text & Boolean Dispatch
//==================================================================================

fn string_row<S: SourceAccessor + ?Sized>(
    column: &mut Column,
    row: usize,
    source: &S,
    src_idx: usize,
) -> Result<RowStep, TambakError> {
    match source.marshal(src_idx, row, TambakDataType::String)? {
        Some(Scalar::String(text)) => column.set_string(row, text)?,
        Some(other) => column.set_string(row, other.to_text())?,
        None => return Ok(RowStep::Null),
    }
    Ok(RowStep::Stored)
}

fn bool_row<S: SourceAccessor + ?Sized>(
    column: &mut Column,
    row: usize,
    source: &S,
    src_idx: usize,
) -> Result<RowStep, TambakError> {
    match source.marshal(src_idx, row, TambakDataType::Boolean)? {
        Some(Scalar::Boolean(v)) => {
            column.set_bool(row, v)?;
            Ok(RowStep::Stored)
        }
        Some(other) => {
            log::warn!(
                "Column '{}': row {} value '{}' is not a boolean, storing null",
                column.name(),
                row,
                other
            );
            Ok(RowStep::Null)
        }
        None => Ok(RowStep::Null),
    }
}
