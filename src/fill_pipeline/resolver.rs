//! Maps each source column's native Arrow type to the dtype it is filled as.
//!
//! This is the resolution policy, deliberately coarser than
//! `TambakDataType::from_arrow_type`: only homogeneous fixed-width numeric and
//! boolean arrays keep their own dtype, every other flat layout (text, temporal,
//! decimal, dictionary, ...) resolves to `String`, and nested layouts are rejected.

use arrow::datatypes::DataType;

use crate::error::TambakError;
use crate::types::TambakDataType;

/// Resolves one source column.
pub fn resolve_column(name: &str, native: &DataType) -> Result<TambakDataType, TambakError> {
    let dtype = match native {
        DataType::Int8 => TambakDataType::Int8,
        DataType::Int16 => TambakDataType::Int16,
        DataType::Int32 => TambakDataType::Int32,
        DataType::Int64 => TambakDataType::Int64,
        DataType::UInt8 => TambakDataType::UInt8,
        DataType::UInt16 => TambakDataType::UInt16,
        DataType::UInt32 => TambakDataType::UInt32,
        DataType::UInt64 => TambakDataType::UInt64,
        DataType::Float32 => TambakDataType::Float32,
        DataType::Float64 => TambakDataType::Float64,
        DataType::Boolean => TambakDataType::Boolean,
        DataType::List(_)
        | DataType::LargeList(_)
        | DataType::FixedSizeList(_, _)
        | DataType::Map(_, _)
        | DataType::Struct(_)
        | DataType::Union(_, _) => {
            return Err(TambakError::UnsupportedContainerError {
                column: name.to_string(),
                layout: format!("{:?}", native),
            })
        }
        _ => TambakDataType::String,
    };
    Ok(dtype)
}

/// Resolves a whole source schema, in order. The first nested column aborts.
pub fn resolve_schema(
    schema: &[(String, DataType)],
) -> Result<(Vec<String>, Vec<TambakDataType>), TambakError> {
    let mut names = Vec::with_capacity(schema.len());
    let mut types = Vec::with_capacity(schema.len());
    for (name, native) in schema {
        types.push(resolve_column(name, native)?);
        names.push(name.clone());
    }
    Ok((names, types))
}
