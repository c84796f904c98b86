//! Integer timestamp rescaling into canonical milliseconds.

use arrow::datatypes::TimeUnit;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Multiplies by `factor`, or `None` on overflow.
pub fn rescale(value: i64, factor: i64) -> Option<i64> {
    value.checked_mul(factor)
}

/// Converts a timestamp in `unit` to milliseconds. Sub-millisecond units
/// truncate toward negative infinity so that ordering is preserved.
pub fn unit_to_millis(value: i64, unit: &TimeUnit) -> Option<i64> {
    match unit {
        TimeUnit::Second => value.checked_mul(1_000),
        TimeUnit::Millisecond => Some(value),
        TimeUnit::Microsecond => Some(value.div_euclid(1_000)),
        TimeUnit::Nanosecond => Some(value.div_euclid(1_000_000)),
    }
}

pub fn days_to_millis(days: i32) -> i64 {
    i64::from(days) * MILLIS_PER_DAY
}
