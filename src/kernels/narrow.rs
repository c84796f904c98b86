//! Lossless narrowing of a loosely-typed source cell into a fixed-width element.
//!
//! The iterative fill path reads every numeric source value into a `NumericCell`
//! and asks this kernel for a `T`. A `None` means the value cannot be represented
//! exactly; the caller decides between promotion and a null.

use num_traits::{NumCast, ToPrimitive};

/// One numeric source value, widened to the largest type of its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    /// Marked null by the source (including floating NaN).
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    /// A value that does not parse as a number (e.g. free text).
    NonNumeric,
}

impl NumericCell {
    /// Parses loosely-typed text. Integers are preferred over floats so that
    /// `"9007199254740993"` survives into an int64 column exactly.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return NumericCell::Int(v);
        }
        if let Ok(v) = trimmed.parse::<u64>() {
            return NumericCell::UInt(v);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => NumericCell::Null,
            Ok(v) => NumericCell::Float(v),
            Err(_) => NumericCell::NonNumeric,
        }
    }

    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            NumericCell::Null
        } else {
            NumericCell::Float(v)
        }
    }
}

/// Converts to an integer type `T` only when the value is exactly representable.
/// Floats must be integral and in range.
pub fn narrow_int<T: NumCast>(cell: NumericCell) -> Option<T> {
    match cell {
        NumericCell::Int(v) => T::from(v),
        NumericCell::UInt(v) => T::from(v),
        NumericCell::Float(v) if v.is_finite() && v.fract() == 0.0 => T::from(v),
        _ => None,
    }
}

/// Converts to a float type `T`. Integers may round; out-of-range values
/// (e.g. `1e300` into `f32`) are rejected rather than saturated to infinity.
pub fn narrow_float<T: NumCast + ToPrimitive>(cell: NumericCell) -> Option<T> {
    let out: T = match cell {
        NumericCell::Int(v) => T::from(v)?,
        NumericCell::UInt(v) => T::from(v)?,
        NumericCell::Float(v) => T::from(v)?,
        _ => return None,
    };
    let source_finite = match cell {
        NumericCell::Float(v) => v.is_finite(),
        _ => true,
    };
    match out.to_f64() {
        Some(f) if f.is_finite() || !source_finite => Some(out),
        _ => None,
    }
}
