//! Single-element values exchanged with a source accessor and read back from columns.

use chrono::{DateTime, Datelike, NaiveDate};
use std::fmt;

use super::TambakDataType;

/// A structured calendar date as delivered by a source's scalar marshal.
///
/// Components are kept raw so that an invalid combination (e.g. February 30th)
/// can be detected by the fill pipeline instead of failing inside the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Returns the calendar date, or `None` if the components do not form a valid date.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DateParts {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for DateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// One non-null element. Nulls are always expressed as `Option::None` around a
/// `Scalar`, never as a sentinel bit pattern inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Date(DateParts),
    /// Milliseconds since the Unix epoch.
    Time(i64),
    String(String),
}

impl Scalar {
    pub fn dtype(&self) -> TambakDataType {
        match self {
            Scalar::Int8(_) => TambakDataType::Int8,
            Scalar::Int16(_) => TambakDataType::Int16,
            Scalar::Int32(_) => TambakDataType::Int32,
            Scalar::Int64(_) => TambakDataType::Int64,
            Scalar::UInt8(_) => TambakDataType::UInt8,
            Scalar::UInt16(_) => TambakDataType::UInt16,
            Scalar::UInt32(_) => TambakDataType::UInt32,
            Scalar::UInt64(_) => TambakDataType::UInt64,
            Scalar::Float32(_) => TambakDataType::Float32,
            Scalar::Float64(_) => TambakDataType::Float64,
            Scalar::Boolean(_) => TambakDataType::Boolean,
            Scalar::Date(_) => TambakDataType::Date,
            Scalar::Time(_) => TambakDataType::Time,
            Scalar::String(_) => TambakDataType::String,
        }
    }

    /// Widens a numeric scalar to `f64`. Non-numeric scalars return `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Int8(v) => Some(v as f64),
            Scalar::Int16(v) => Some(v as f64),
            Scalar::Int32(v) => Some(v as f64),
            Scalar::Int64(v) => Some(v as f64),
            Scalar::UInt8(v) => Some(v as f64),
            Scalar::UInt16(v) => Some(v as f64),
            Scalar::UInt32(v) => Some(v as f64),
            Scalar::UInt64(v) => Some(v as f64),
            Scalar::Float32(v) => Some(v as f64),
            Scalar::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value in the engine's canonical text form.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int8(v) => write!(f, "{}", v),
            Scalar::Int16(v) => write!(f, "{}", v),
            Scalar::Int32(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::UInt8(v) => write!(f, "{}", v),
            Scalar::UInt16(v) => write!(f, "{}", v),
            Scalar::UInt32(v) => write!(f, "{}", v),
            Scalar::UInt64(v) => write!(f, "{}", v),
            Scalar::Float32(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::Boolean(v) => write!(f, "{}", v),
            Scalar::Date(d) => write!(f, "{}", d),
            Scalar::Time(ms) => match DateTime::from_timestamp_millis(*ms) {
                Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.3f")),
                None => write!(f, "{}", ms),
            },
            Scalar::String(s) => f.write_str(s),
        }
    }
}
