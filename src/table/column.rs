// In: src/table/column.rs

//! A single named column: a typed buffer plus its validity bitmap.
//!
//! `ColumnData` is a tagged variant over the supported element types. Changing a
//! column's dtype is done by `Column::retype`, which consumes the old value and
//! returns a new one; the owning `Table` re-binds it in place.

use chrono::{Datelike, NaiveDate};

use crate::error::TambakError;
use crate::kernels::typed_copy::as_bytes;
use crate::null_handling::{NullPolicy, RowStatus, ValidityBitmap};
use crate::traits::FixedWidth;
use crate::types::{DateParts, Scalar, TambakDataType};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
pub(crate) const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// The typed element buffer of a column. Every variant holds exactly one
/// element per row; validity lives beside it in the `Column`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Boolean(Vec<bool>),
    /// Days since the common era (`NaiveDate::num_days_from_ce`).
    Date(Vec<i32>),
    /// Milliseconds since the Unix epoch.
    Time(Vec<i64>),
    String(Vec<String>),
}

/// Runs `$body` with `$buf` bound to the inner `Vec` of whichever variant `$data` is.
macro_rules! with_buffer {
    ($data:expr, $buf:ident => $body:expr) => {
        match $data {
            ColumnData::Int8($buf) => $body,
            ColumnData::Int16($buf) => $body,
            ColumnData::Int32($buf) => $body,
            ColumnData::Int64($buf) => $body,
            ColumnData::UInt8($buf) => $body,
            ColumnData::UInt16($buf) => $body,
            ColumnData::UInt32($buf) => $body,
            ColumnData::UInt64($buf) => $body,
            ColumnData::Float32($buf) => $body,
            ColumnData::Float64($buf) => $body,
            ColumnData::Boolean($buf) => $body,
            ColumnData::Date($buf) => $body,
            ColumnData::Time($buf) => $body,
            ColumnData::String($buf) => $body,
        }
    };
}

impl ColumnData {
    /// A zero-initialized buffer of `len` elements.
    pub fn new(dtype: TambakDataType, len: usize) -> Self {
        match dtype {
            TambakDataType::Int8 => ColumnData::Int8(vec![0; len]),
            TambakDataType::Int16 => ColumnData::Int16(vec![0; len]),
            TambakDataType::Int32 => ColumnData::Int32(vec![0; len]),
            TambakDataType::Int64 => ColumnData::Int64(vec![0; len]),
            TambakDataType::UInt8 => ColumnData::UInt8(vec![0; len]),
            TambakDataType::UInt16 => ColumnData::UInt16(vec![0; len]),
            TambakDataType::UInt32 => ColumnData::UInt32(vec![0; len]),
            TambakDataType::UInt64 => ColumnData::UInt64(vec![0; len]),
            TambakDataType::Float32 => ColumnData::Float32(vec![0.0; len]),
            TambakDataType::Float64 => ColumnData::Float64(vec![0.0; len]),
            TambakDataType::Boolean => ColumnData::Boolean(vec![false; len]),
            TambakDataType::Date => ColumnData::Date(vec![UNIX_EPOCH_DAYS_FROM_CE; len]),
            TambakDataType::Time => ColumnData::Time(vec![0; len]),
            TambakDataType::String => ColumnData::String(vec![String::new(); len]),
        }
    }

    pub fn dtype(&self) -> TambakDataType {
        match self {
            ColumnData::Int8(_) => TambakDataType::Int8,
            ColumnData::Int16(_) => TambakDataType::Int16,
            ColumnData::Int32(_) => TambakDataType::Int32,
            ColumnData::Int64(_) => TambakDataType::Int64,
            ColumnData::UInt8(_) => TambakDataType::UInt8,
            ColumnData::UInt16(_) => TambakDataType::UInt16,
            ColumnData::UInt32(_) => TambakDataType::UInt32,
            ColumnData::UInt64(_) => TambakDataType::UInt64,
            ColumnData::Float32(_) => TambakDataType::Float32,
            ColumnData::Float64(_) => TambakDataType::Float64,
            ColumnData::Boolean(_) => TambakDataType::Boolean,
            ColumnData::Date(_) => TambakDataType::Date,
            ColumnData::Time(_) => TambakDataType::Time,
            ColumnData::String(_) => TambakDataType::String,
        }
    }

    pub fn len(&self) -> usize {
        with_buffer!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resize(&mut self, len: usize) {
        match self {
            ColumnData::Date(values) => values.resize(len, UNIX_EPOCH_DAYS_FROM_CE),
            other => with_buffer!(other, values => values.resize(len, Default::default())),
        }
    }

    /// Reads the raw element at `row`, ignoring validity.
    pub fn value(&self, row: usize) -> Option<Scalar> {
        let scalar = match self {
            ColumnData::Int8(v) => Scalar::Int8(*v.get(row)?),
            ColumnData::Int16(v) => Scalar::Int16(*v.get(row)?),
            ColumnData::Int32(v) => Scalar::Int32(*v.get(row)?),
            ColumnData::Int64(v) => Scalar::Int64(*v.get(row)?),
            ColumnData::UInt8(v) => Scalar::UInt8(*v.get(row)?),
            ColumnData::UInt16(v) => Scalar::UInt16(*v.get(row)?),
            ColumnData::UInt32(v) => Scalar::UInt32(*v.get(row)?),
            ColumnData::UInt64(v) => Scalar::UInt64(*v.get(row)?),
            ColumnData::Float32(v) => Scalar::Float32(*v.get(row)?),
            ColumnData::Float64(v) => Scalar::Float64(*v.get(row)?),
            ColumnData::Boolean(v) => Scalar::Boolean(*v.get(row)?),
            ColumnData::Date(v) => {
                let date = NaiveDate::from_num_days_from_ce_opt(*v.get(row)?)?;
                Scalar::Date(DateParts::from(date))
            }
            ColumnData::Time(v) => Scalar::Time(*v.get(row)?),
            ColumnData::String(v) => Scalar::String(v.get(row)?.clone()),
        };
        Some(scalar)
    }

    /// Writes `value` at `row`. Returns `false` (writing nothing) if the scalar's
    /// type does not match the buffer, the row is out of range, or a date is invalid.
    fn put(&mut self, row: usize, value: Scalar) -> bool {
        macro_rules! put_into {
            ($values:expr, $v:expr) => {
                match $values.get_mut(row) {
                    Some(slot) => {
                        *slot = $v;
                        true
                    }
                    None => false,
                }
            };
        }

        match (self, value) {
            (ColumnData::Int8(vals), Scalar::Int8(v)) => put_into!(vals, v),
            (ColumnData::Int16(vals), Scalar::Int16(v)) => put_into!(vals, v),
            (ColumnData::Int32(vals), Scalar::Int32(v)) => put_into!(vals, v),
            (ColumnData::Int64(vals), Scalar::Int64(v)) => put_into!(vals, v),
            (ColumnData::UInt8(vals), Scalar::UInt8(v)) => put_into!(vals, v),
            (ColumnData::UInt16(vals), Scalar::UInt16(v)) => put_into!(vals, v),
            (ColumnData::UInt32(vals), Scalar::UInt32(v)) => put_into!(vals, v),
            (ColumnData::UInt64(vals), Scalar::UInt64(v)) => put_into!(vals, v),
            (ColumnData::Float32(vals), Scalar::Float32(v)) => put_into!(vals, v),
            (ColumnData::Float64(vals), Scalar::Float64(v)) => put_into!(vals, v),
            (ColumnData::Boolean(vals), Scalar::Boolean(v)) => put_into!(vals, v),
            (ColumnData::Date(vals), Scalar::Date(parts)) => match parts.to_naive_date() {
                Some(date) => put_into!(vals, date.num_days_from_ce()),
                None => false,
            },
            (ColumnData::Time(vals), Scalar::Time(v)) => put_into!(vals, v),
            (ColumnData::String(vals), Scalar::String(v)) => put_into!(vals, v),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
    validity: ValidityBitmap,
}

impl Column {
    /// Creates a column of `len` rows, all never set.
    pub fn new(name: impl Into<String>, dtype: TambakDataType, len: usize) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::new(dtype, len),
            validity: ValidityBitmap::new_invalid(len),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> TambakDataType {
        self.data.dtype()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn validity(&self) -> &ValidityBitmap {
        &self.validity
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut ColumnData, &mut ValidityBitmap) {
        (&mut self.data, &mut self.validity)
    }

    pub fn is_valid(&self, row: usize) -> bool {
        self.validity.is_valid(row)
    }

    pub fn status(&self, row: usize) -> RowStatus {
        self.validity.status(row)
    }

    /// Reads row `row`, or `None` if it is null or out of range.
    pub fn get(&self, row: usize) -> Option<Scalar> {
        if !self.validity.is_valid(row) {
            return None;
        }
        self.data.value(row)
    }

    /// Borrows the typed buffer, if this column stores `T`.
    pub fn as_slice<T: FixedWidth>(&self) -> Option<&[T]> {
        T::buffer(&self.data)
    }

    /// A byte view of the buffer for fixed-width numeric columns.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        macro_rules! bytes_of {
            ($values:expr) => {
                Some(as_bytes($values.as_slice()))
            };
        }
        match &self.data {
            ColumnData::Int8(v) => bytes_of!(v),
            ColumnData::Int16(v) => bytes_of!(v),
            ColumnData::Int32(v) => bytes_of!(v),
            ColumnData::Int64(v) => bytes_of!(v),
            ColumnData::UInt8(v) => bytes_of!(v),
            ColumnData::UInt16(v) => bytes_of!(v),
            ColumnData::UInt32(v) => bytes_of!(v),
            ColumnData::UInt64(v) => bytes_of!(v),
            ColumnData::Float32(v) => bytes_of!(v),
            ColumnData::Float64(v) => bytes_of!(v),
            _ => None,
        }
    }

    fn check_row(&self, row: usize) -> Result<(), TambakError> {
        if row >= self.len() {
            return Err(TambakError::RowOutOfBounds {
                row,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn mismatch(&self, expected: TambakDataType) -> TambakError {
        TambakError::TypeMismatch {
            column: self.name.clone(),
            expected,
            actual: self.dtype(),
        }
    }

    /// Writes a fixed-width value at `row` and marks it valid.
    pub fn set_nth<T: FixedWidth>(&mut self, row: usize, value: T) -> Result<(), TambakError> {
        self.check_row(row)?;
        let Some(values) = T::buffer_mut(&mut self.data) else {
            return Err(self.mismatch(T::DTYPE));
        };
        values[row] = value;
        self.validity.set_valid(row);
        Ok(())
    }

    pub fn set_date(&mut self, row: usize, date: NaiveDate) -> Result<(), TambakError> {
        self.set_scalar(row, Scalar::Date(DateParts::from(date)))
    }

    pub fn set_time(&mut self, row: usize, millis: i64) -> Result<(), TambakError> {
        self.set_scalar(row, Scalar::Time(millis))
    }

    pub fn set_bool(&mut self, row: usize, value: bool) -> Result<(), TambakError> {
        self.set_scalar(row, Scalar::Boolean(value))
    }

    pub fn set_string(&mut self, row: usize, value: String) -> Result<(), TambakError> {
        self.set_scalar(row, Scalar::String(value))
    }

    /// Writes any scalar whose dtype matches the column and marks the row valid.
    pub fn set_scalar(&mut self, row: usize, value: Scalar) -> Result<(), TambakError> {
        self.check_row(row)?;
        let expected = value.dtype();
        if expected != self.dtype() {
            return Err(self.mismatch(expected));
        }
        if let Scalar::Date(parts) = &value {
            if parts.to_naive_date().is_none() {
                return Err(TambakError::InternalError(format!(
                    "Invalid date {} written to column '{}'",
                    parts, self.name
                )));
            }
        }
        if !self.data.put(row, value) {
            return Err(TambakError::InternalError(format!(
                "Failed to write row {} of column '{}'",
                row, self.name
            )));
        }
        self.validity.set_valid(row);
        Ok(())
    }

    /// Marks `row` null under `policy`.
    pub fn mark_null(&mut self, row: usize, policy: NullPolicy) -> Result<(), TambakError> {
        self.check_row(row)?;
        self.validity.mark_null(row, policy);
        Ok(())
    }

    /// Grows or truncates to `len` rows. New rows are zeroed and never set.
    pub(crate) fn resize(&mut self, len: usize) {
        self.data.resize(len);
        self.validity.resize(len);
    }

    /// A byte-for-byte copy of this column under a different name.
    pub(crate) fn clone_as(&self, name: impl Into<String>) -> Column {
        Column {
            name: name.into(),
            data: self.data.clone(),
            validity: self.validity.clone(),
        }
    }

    /// Consumes the column and rebuilds it under `to`.
    ///
    /// Rows `[0, upto)` that are valid are converted into the new representation
    /// (numeric widening for `Float64`, canonical text for `String`); their
    /// validity and retraction marks are kept. Rows from `upto` on are zeroed but
    /// keep their validity bits, since the caller is about to rewrite them.
    /// A valid row whose value has no representation under `to` becomes never-set.
    pub(crate) fn retype(self, to: TambakDataType, upto: usize) -> Column {
        let Column {
            name,
            data,
            mut validity,
        } = self;
        let len = data.len();
        let mut converted = ColumnData::new(to, len);

        for row in 0..upto.min(len) {
            if !validity.is_valid(row) {
                continue;
            }
            let written = data
                .value(row)
                .and_then(|value| convert_scalar(value, to))
                .map(|value| converted.put(row, value))
                .unwrap_or(false);
            if !written {
                validity.clear(row);
            }
        }

        Column {
            name,
            data: converted,
            validity,
        }
    }
}

/// Converts a stored value to the representation of `to`, if one exists.
fn convert_scalar(value: Scalar, to: TambakDataType) -> Option<Scalar> {
    if value.dtype() == to {
        return Some(value);
    }
    match to {
        TambakDataType::Float64 => value.as_f64().map(Scalar::Float64),
        TambakDataType::String => Some(Scalar::String(value.to_text())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_column_is_zeroed_and_never_set() {
        let column = Column::new("a", TambakDataType::Int32, 3);
        assert_eq!(column.len(), 3);
        assert_eq!(column.as_slice::<i32>(), Some(&[0, 0, 0][..]));
        assert_eq!(column.get(0), None);
        assert_eq!(column.status(0), RowStatus::Invalid);
    }

    #[test]
    fn test_set_nth_rejects_wrong_element_type() {
        let mut column = Column::new("a", TambakDataType::Int32, 2);
        let result = column.set_nth::<i64>(0, 5);
        assert!(matches!(
            result,
            Err(TambakError::TypeMismatch {
                expected: TambakDataType::Int64,
                actual: TambakDataType::Int32,
                ..
            })
        ));
        assert!(!column.is_valid(0));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut column = Column::new("s", TambakDataType::String, 1);
        let result = column.set_string(1, "x".to_string());
        assert!(matches!(result, Err(TambakError::RowOutOfBounds { row: 1, len: 1 })));
    }

    #[test]
    fn test_date_and_time_roundtrip() {
        let mut column = Column::new("d", TambakDataType::Date, 1);
        let date = NaiveDate::from_ymd_opt(2021, 7, 4).unwrap();
        column.set_date(0, date).unwrap();
        assert_eq!(column.get(0), Some(Scalar::Date(DateParts::new(2021, 7, 4))));

        let mut times = Column::new("t", TambakDataType::Time, 1);
        times.set_time(0, 1_600_000_000_000).unwrap();
        assert_eq!(times.get(0), Some(Scalar::Time(1_600_000_000_000)));
    }

    #[test]
    fn test_retype_int32_to_float64_keeps_prefix_and_validity() {
        let mut column = Column::new("a", TambakDataType::Int32, 4);
        column.set_nth(0, 10i32).unwrap();
        column.mark_null(1, NullPolicy::Update).unwrap();
        column.set_nth(2, -7i32).unwrap();
        column.set_nth(3, 99i32).unwrap();

        let promoted = column.retype(TambakDataType::Float64, 3);

        assert_eq!(promoted.dtype(), TambakDataType::Float64);
        assert_eq!(promoted.len(), 4);
        assert_eq!(promoted.get(0), Some(Scalar::Float64(10.0)));
        assert_eq!(promoted.status(1), RowStatus::Retracted);
        assert_eq!(promoted.get(2), Some(Scalar::Float64(-7.0)));
        // Row 3 was past the promotion point: zeroed, awaiting rewrite.
        assert_eq!(promoted.as_slice::<f64>().unwrap()[3], 0.0);
    }

    #[test]
    fn test_retype_to_string_renders_prefix_as_text() {
        let mut column = Column::new("a", TambakDataType::Int64, 3);
        column.set_nth(0, 1i64).unwrap();
        column.set_nth(1, -2i64).unwrap();

        let promoted = column.retype(TambakDataType::String, 2);

        assert_eq!(promoted.get(0), Some(Scalar::String("1".to_string())));
        assert_eq!(promoted.get(1), Some(Scalar::String("-2".to_string())));
        assert_eq!(promoted.get(2), None);
    }

    #[test]
    fn test_as_bytes_is_little_endian_view() {
        let mut column = Column::new("u", TambakDataType::UInt16, 2);
        column.set_nth(0, 0x0102u16).unwrap();
        column.set_nth(1, 0x0304u16).unwrap();
        let bytes = column.as_bytes().unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(u16::from_ne_bytes([bytes[0], bytes[1]]), 0x0102);
        assert!(Column::new("s", TambakDataType::String, 1).as_bytes().is_none());
    }
}
