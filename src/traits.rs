// In: src/traits.rs

//! This module defines shared traits used across the column store and the kernels.

use arrow::datatypes::{
    ArrowNativeType, ArrowPrimitiveType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use num_traits::NumCast;

use crate::table::ColumnData;
use crate::types::{Scalar, TambakDataType};

/// A fixed-width numeric element type that can be stored in a column buffer
/// and moved by the bulk copy path.
///
/// The trait links three views of the same type: the Rust primitive, the
/// engine's dtype tag, and the Arrow primitive type. A bulk transfer is only
/// ever expressed as `&[T] -> &mut [T]` for a single `T: FixedWidth`, so a copy
/// between different layouts cannot be written.
pub trait FixedWidth:
    bytemuck::Pod + ArrowNativeType + NumCast + Default + std::fmt::Debug + 'static
{
    const DTYPE: TambakDataType;
    type ArrowType: ArrowPrimitiveType<Native = Self>;

    /// Borrows the column buffer if it holds elements of this type.
    fn buffer(data: &ColumnData) -> Option<&[Self]>;

    /// Mutably borrows the column buffer if it holds elements of this type.
    fn buffer_mut(data: &mut ColumnData) -> Option<&mut [Self]>;

    fn into_scalar(self) -> Scalar;
}

// Implement the trait for all fixed-width primitive types.
macro_rules! impl_fixed_width {
    ($T:ty, $variant:ident, $arrow:ty) => {
        impl FixedWidth for $T {
            const DTYPE: TambakDataType = TambakDataType::$variant;
            type ArrowType = $arrow;

            fn buffer(data: &ColumnData) -> Option<&[Self]> {
                match data {
                    ColumnData::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            fn buffer_mut(data: &mut ColumnData) -> Option<&mut [Self]> {
                match data {
                    ColumnData::$variant(values) => Some(values.as_mut_slice()),
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }
        }
    };
}

impl_fixed_width!(i8, Int8, Int8Type);
impl_fixed_width!(i16, Int16, Int16Type);
impl_fixed_width!(i32, Int32, Int32Type);
impl_fixed_width!(i64, Int64, Int64Type);
impl_fixed_width!(u8, UInt8, UInt8Type);
impl_fixed_width!(u16, UInt16, UInt16Type);
impl_fixed_width!(u32, UInt32, UInt32Type);
impl_fixed_width!(u64, UInt64, UInt64Type);
impl_fixed_width!(f32, Float32, Float32Type);
impl_fixed_width!(f64, Float64, Float64Type);
