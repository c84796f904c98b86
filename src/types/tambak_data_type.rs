//! This module defines the canonical, type-safe representation of column dtypes
//! used throughout the tambak ingestion core.

use crate::error::TambakError;
use arrow::datatypes::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The canonical, internal representation of a column's element type.
///
/// Every `Column` carries exactly one of these tags. The fixed-width numeric
/// variants are the only ones eligible for the bulk copy path; `Float64` and
/// `String` are the only promotion targets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TambakDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Boolean,
    /// Calendar date (no time component).
    Date,
    /// Timestamp in canonical milliseconds since the Unix epoch.
    Time,
    String,
}

impl TambakDataType {
    /// Converts an Arrow `DataType` into a `TambakDataType`.
    ///
    /// This is the declaration mapping (used when a schema is described in Arrow
    /// terms), not the source resolution policy in `fill_pipeline::resolver`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, TambakError> {
        match arrow_type {
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Boolean => Ok(Self::Boolean),
            ArrowDataType::Date32 | ArrowDataType::Date64 => Ok(Self::Date),
            ArrowDataType::Timestamp(_, _) => Ok(Self::Time),
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => Ok(Self::String),
            dt => Err(TambakError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to TambakDataType",
                dt
            ))),
        }
    }

    /// Converts a `TambakDataType` into the Arrow `DataType` used on export.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Int8 => ArrowDataType::Int8,
            Self::Int16 => ArrowDataType::Int16,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::UInt8 => ArrowDataType::UInt8,
            Self::UInt16 => ArrowDataType::UInt16,
            Self::UInt32 => ArrowDataType::UInt32,
            Self::UInt64 => ArrowDataType::UInt64,
            Self::Float32 => ArrowDataType::Float32,
            Self::Float64 => ArrowDataType::Float64,
            Self::Boolean => ArrowDataType::Boolean,
            Self::Date => ArrowDataType::Date32,
            Self::Time => ArrowDataType::Timestamp(TimeUnit::Millisecond, None),
            Self::String => ArrowDataType::Utf8,
        }
    }

    /// Returns the element width in bytes for fixed-width numeric types.
    pub fn element_width(&self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            _ => None,
        }
    }

    /// Returns `true` if a column of this type can be filled by a verbatim typed copy.
    pub fn is_bulk_copyable(&self) -> bool {
        self.element_width().is_some()
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns `true` if the data type is an unsigned integer.
    pub fn is_unsigned_int(&self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns `true` for every integer and floating-point type.
    pub fn is_numeric(&self) -> bool {
        self.is_signed_int() || self.is_unsigned_int() || self.is_float()
    }
}

/// Provides the canonical string representation for a `TambakDataType`.
impl fmt::Display for TambakDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // These string representations are part of the public contract.
        write!(f, "{:?}", self)
    }
}

/// Parses a dtype name, case-insensitively. Accepts the `Display` form
/// (`"Int32"`) as well as the common short aliases (`"int"`, `"float"`, `"str"`).
impl FromStr for TambakDataType {
    type Err = TambakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dtype = match s.to_ascii_lowercase().as_str() {
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" | "int" | "integer" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" | "float" => Self::Float64,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "time" | "datetime" => Self::Time,
            "string" | "str" => Self::String,
            other => {
                return Err(TambakError::UnsupportedType(format!(
                    "Unknown dtype name '{}'",
                    other
                )))
            }
        };
        Ok(dtype)
    }
}
