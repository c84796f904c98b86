// In: src/bridge/arrow_source.rs

//! `SourceAccessor` over an Arrow `RecordBatch`.
//!
//! The null set of a column is its logical Arrow nulls plus every NaN in a float
//! column. Dictionary-encoded columns are decoded once, when the source is built.
//! `marshal` converts single elements on demand; it never fails for a value it
//! cannot represent, it returns `Ok(None)` and lets the pipeline store a null.

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    LargeStringArray, StringArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, Schema as ArrowSchema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::sync::Arc;

use crate::error::TambakError;
use crate::fill_pipeline::iterative::numeric_cell;
use crate::kernels::{days_to_millis, narrow_float, narrow_int, unit_to_millis, NumericCell};
use crate::source::{decode_dictionary, is_null_at, BulkColumn, SourceAccessor};
use crate::table::column::UNIX_EPOCH_DAYS_FROM_CE;
use crate::types::{DateParts, Scalar, TambakDataType};

#[derive(Debug, Clone)]
pub struct ArrowSource {
    batch: RecordBatch,
}

impl ArrowSource {
    /// Wraps `batch`, decoding every dictionary column to its value type.
    pub fn new(batch: RecordBatch) -> Result<Self, TambakError> {
        let schema = batch.schema();
        let has_dictionary = schema
            .fields()
            .iter()
            .any(|f| matches!(f.data_type(), DataType::Dictionary(_, _)));
        if !has_dictionary {
            return Ok(Self { batch });
        }

        let mut fields = Vec::with_capacity(batch.num_columns());
        let mut columns = Vec::with_capacity(batch.num_columns());
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let decoded = decode_dictionary(array)?;
            fields.push(
                field
                    .as_ref()
                    .clone()
                    .with_data_type(decoded.data_type().clone())
                    .with_nullable(true),
            );
            columns.push(decoded);
        }
        let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
        let batch = RecordBatch::try_new_with_options(
            Arc::new(ArrowSchema::new(fields)),
            columns,
            &options,
        )?;
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    fn array(&self, column_index: usize) -> Result<&ArrayRef, TambakError> {
        if column_index >= self.batch.num_columns() {
            return Err(TambakError::InternalError(format!(
                "Column index {} requested from a batch of {} columns",
                column_index,
                self.batch.num_columns()
            )));
        }
        Ok(self.batch.column(column_index))
    }
}

impl SourceAccessor for ArrowSource {
    fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    fn schema(&self) -> Vec<(String, DataType)> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), f.data_type().clone()))
            .collect()
    }

    fn bulk_column(&self, name: &str, _dtype: TambakDataType) -> Result<BulkColumn, TambakError> {
        let array = self
            .batch
            .column_by_name(name)
            .ok_or_else(|| TambakError::missing_in_source(name))?
            .clone();
        let null_indices = null_indices(array.as_ref());
        Ok(BulkColumn {
            array,
            null_indices,
        })
    }

    fn marshal(
        &self,
        column_index: usize,
        row: usize,
        dtype: TambakDataType,
    ) -> Result<Option<Scalar>, TambakError> {
        let array = self.array(column_index)?.as_ref();
        if row >= array.len() || is_null_at(array, row) {
            return Ok(None);
        }

        let scalar = match dtype {
            TambakDataType::String => marshal_text(array, row)?.map(Scalar::String),
            TambakDataType::Date => marshal_date(array, row).map(Scalar::Date),
            TambakDataType::Time => marshal_time(array, row).map(Scalar::Time),
            TambakDataType::Boolean => marshal_bool(array, row).map(Scalar::Boolean),
            numeric => marshal_numeric(numeric_cell(array, row), numeric),
        };
        Ok(scalar)
    }
}

/// Logical Arrow nulls plus NaN floats, ascending.
fn null_indices(array: &dyn Array) -> Vec<usize> {
    let nulls = array.logical_nulls();
    let is_null = |i: usize| nulls.as_ref().map_or(false, |n| n.is_null(i));
    let is_nan: Box<dyn Fn(usize) -> bool + '_> = match array.data_type() {
        DataType::Float32 => match array.as_any().downcast_ref::<Float32Array>() {
            Some(a) => Box::new(move |i| a.value(i).is_nan()),
            None => Box::new(|_| false),
        },
        DataType::Float64 => match array.as_any().downcast_ref::<Float64Array>() {
            Some(a) => Box::new(move |i| a.value(i).is_nan()),
            None => Box::new(|_| false),
        },
        _ => Box::new(|_| false),
    };
    (0..array.len())
        .filter(|&i| is_null(i) || is_nan(i))
        .collect()
}

//==================================================================================
// 1. Per-dtype Marshalling
//==================================================================================

fn marshal_text(array: &dyn Array, row: usize) -> Result<Option<String>, TambakError> {
    if let Some(a) = array.as_any().downcast_ref::<StringArray>() {
        return Ok(Some(a.value(row).to_string()));
    }
    if let Some(a) = array.as_any().downcast_ref::<LargeStringArray>() {
        return Ok(Some(a.value(row).to_string()));
    }
    match array.data_type() {
        DataType::Float32 | DataType::Float64 => Ok(match numeric_cell(array, row) {
            NumericCell::Float(v) => Some(Scalar::Float64(v).to_text()),
            _ => None,
        }),
        dt if dt.is_integer() => Ok(match numeric_cell(array, row) {
            NumericCell::Int(v) => Some(v.to_string()),
            NumericCell::UInt(v) => Some(v.to_string()),
            _ => None,
        }),
        DataType::Date32 | DataType::Date64 => Ok(marshal_date(array, row).map(|d| d.to_string())),
        DataType::Timestamp(_, _) => Ok(marshal_time(array, row).map(|ms| Scalar::Time(ms).to_text())),
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            Ok(Some(formatter.value(row).to_string()))
        }
    }
}

fn marshal_date(array: &dyn Array, row: usize) -> Option<DateParts> {
    match array.data_type() {
        DataType::Date32 => {
            let days = array.as_any().downcast_ref::<Date32Array>()?.value(row);
            NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
                .map(DateParts::from)
        }
        DataType::Date64 | DataType::Timestamp(_, _) => {
            let ms = marshal_time(array, row)?;
            DateTime::from_timestamp_millis(ms).map(|ts| DateParts::from(ts.date_naive()))
        }
        DataType::Utf8 | DataType::LargeUtf8 => parse_date_parts(&marshal_text(array, row).ok()??),
        _ => None,
    }
}

/// Splits `YYYY-MM-DD` into raw components without validating the calendar.
fn parse_date_parts(text: &str) -> Option<DateParts> {
    let mut parts = text.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.get(..2)?.parse::<u32>().ok()?;
    Some(DateParts::new(year, month, day))
}

fn marshal_time(array: &dyn Array, row: usize) -> Option<i64> {
    macro_rules! value_of {
        ($A:ty) => {
            array.as_any().downcast_ref::<$A>()?.value(row)
        };
    }

    match array.data_type() {
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
        DataType::Utf8 | DataType::LargeUtf8 => parse_datetime_millis(&marshal_text(array, row).ok()??),
        dt if dt.is_integer() => match numeric_cell(array, row) {
            NumericCell::Int(v) => Some(v),
            NumericCell::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        },
        _ => None,
    }
}

fn parse_datetime_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc().timestamp_millis())
}

fn marshal_bool(array: &dyn Array, row: usize) -> Option<bool> {
    if let Some(a) = array.as_any().downcast_ref::<BooleanArray>() {
        return Some(a.value(row));
    }
    match numeric_cell(array, row) {
        NumericCell::Int(v) => Some(v != 0),
        NumericCell::UInt(v) => Some(v != 0),
        NumericCell::Float(v) => Some(v != 0.0),
        NumericCell::NonNumeric => {
            let text = marshal_text(array, row).ok()??;
            match text.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" => Some(true),
                "false" | "f" | "no" => Some(false),
                _ => None,
            }
        }
        NumericCell::Null => None,
    }
}

fn marshal_numeric(cell: NumericCell, dtype: TambakDataType) -> Option<Scalar> {
    match dtype {
        TambakDataType::Int8 => narrow_int(cell).map(Scalar::Int8),
        TambakDataType::Int16 => narrow_int(cell).map(Scalar::Int16),
        TambakDataType::Int32 => narrow_int(cell).map(Scalar::Int32),
        TambakDataType::Int64 => narrow_int(cell).map(Scalar::Int64),
        TambakDataType::UInt8 => narrow_int(cell).map(Scalar::UInt8),
        TambakDataType::UInt16 => narrow_int(cell).map(Scalar::UInt16),
        TambakDataType::UInt32 => narrow_int(cell).map(Scalar::UInt32),
        TambakDataType::UInt64 => narrow_int(cell).map(Scalar::UInt64),
        TambakDataType::Float32 => narrow_float(cell).map(Scalar::Float32),
        TambakDataType::Float64 => narrow_float(cell).map(Scalar::Float64),
        _ => None,
    }
}
