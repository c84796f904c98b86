// In: src/bridge/arrow_export.rs

//! Exports filled columns back to Arrow. Validity becomes the null buffer;
//! dates are Date32, times are Timestamp(ms), strings are Utf8.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, PrimitiveArray, StringArray, TimestampMillisecondArray,
};
use arrow::buffer::{NullBuffer, ScalarBuffer};
use arrow::datatypes::ArrowPrimitiveType;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::TambakError;
use crate::table::column::UNIX_EPOCH_DAYS_FROM_CE;
use crate::table::{Column, ColumnData, Table};
use crate::traits::FixedWidth;

fn primitive<T: FixedWidth>(values: &[T], nulls: NullBuffer) -> Result<ArrayRef, TambakError> {
    let array = PrimitiveArray::<T::ArrowType>::try_new(ScalarBuffer::from(values.to_vec()), Some(nulls))?;
    Ok(Arc::new(array))
}

fn with_type<A: ArrowPrimitiveType>(
    values: Vec<A::Native>,
    nulls: NullBuffer,
) -> Result<PrimitiveArray<A>, TambakError> {
    Ok(PrimitiveArray::<A>::try_new(ScalarBuffer::from(values), Some(nulls))?)
}

/// Converts one column into an Arrow array of its dtype's Arrow type.
pub fn column_to_array(column: &Column) -> Result<ArrayRef, TambakError> {
    let validity: Vec<bool> = column.validity().iter().collect();
    let nulls = NullBuffer::from(validity.clone());

    let array: ArrayRef = match column.data() {
        ColumnData::Int8(v) => primitive(v, nulls)?,
        ColumnData::Int16(v) => primitive(v, nulls)?,
        ColumnData::Int32(v) => primitive(v, nulls)?,
        ColumnData::Int64(v) => primitive(v, nulls)?,
        ColumnData::UInt8(v) => primitive(v, nulls)?,
        ColumnData::UInt16(v) => primitive(v, nulls)?,
        ColumnData::UInt32(v) => primitive(v, nulls)?,
        ColumnData::UInt64(v) => primitive(v, nulls)?,
        ColumnData::Float32(v) => primitive(v, nulls)?,
        ColumnData::Float64(v) => primitive(v, nulls)?,
        ColumnData::Boolean(v) => Arc::new(
            v.iter()
                .zip(validity.iter())
                .map(|(value, &ok)| ok.then_some(*value))
                .collect::<BooleanArray>(),
        ),
        ColumnData::Date(v) => {
            let days = v.iter().map(|d| d - UNIX_EPOCH_DAYS_FROM_CE).collect();
            let array: Date32Array = with_type(days, nulls)?;
            Arc::new(array)
        }
        ColumnData::Time(v) => {
            let array: TimestampMillisecondArray = with_type(v.clone(), nulls)?;
            Arc::new(array)
        }
        ColumnData::String(v) => Arc::new(
            v.iter()
                .zip(validity.iter())
                .map(|(value, &ok)| ok.then_some(value.as_str()))
                .collect::<StringArray>(),
        ),
    };
    Ok(array)
}

/// Exports every column, in table order, as one batch.
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch, TambakError> {
    let schema = Arc::new(table.schema().to_arrow());
    let columns = table
        .columns()
        .iter()
        .map(column_to_array)
        .collect::<Result<Vec<_>, _>>()?;
    let options = RecordBatchOptions::new().with_row_count(Some(table.size()));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
