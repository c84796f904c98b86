//! In-place dtype widening of a column mid-fill.
//!
//! Only two paths exist. The offending row and everything after it is rewritten
//! by the caller under the new dtype; rows before it are converted by
//! `Column::retype`.

use serde::{Deserialize, Serialize};

use super::report::{FillReport, Promotion};
use crate::error::TambakError;
use crate::table::Table;
use crate::types::TambakDataType;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPath {
    /// int32 receiving a value it cannot hold.
    IntegerToFloat,
    /// int64 / float64 receiving a value that is not a number.
    NumericToString,
}

impl PromotionPath {
    pub fn resolve(from: TambakDataType, to: TambakDataType) -> Option<Self> {
        match (from, to) {
            (TambakDataType::Int32, TambakDataType::Float64) => Some(Self::IntegerToFloat),
            (TambakDataType::Int64 | TambakDataType::Float64, TambakDataType::String) => {
                Some(Self::NumericToString)
            }
            _ => None,
        }
    }
}

/// Promotes column `idx` of `table` to `to` at `row`, logs it and records it.
pub(crate) fn promote(
    table: &mut Table,
    idx: usize,
    to: TambakDataType,
    row: usize,
    report: &mut FillReport,
) -> Result<(), TambakError> {
    let from = table.column_mut(idx)?.dtype();
    table.promote_column(idx, to, row)?;
    let name = table.column_mut(idx)?.name().to_string();

    log::warn!("Promoting {} to {} from {} at row {}", name, to, from, row);
    log_metric!("event" = "promote", "column" = &name, "from" = from, "to" = to, "row" = row);

    report.promotions.push(Promotion {
        column: name,
        from,
        to,
        row,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_two_paths_exist() {
        use TambakDataType::*;
        assert_eq!(PromotionPath::resolve(Int32, Float64), Some(PromotionPath::IntegerToFloat));
        assert_eq!(PromotionPath::resolve(Int64, String), Some(PromotionPath::NumericToString));
        assert_eq!(PromotionPath::resolve(Float64, String), Some(PromotionPath::NumericToString));
        assert_eq!(PromotionPath::resolve(Int32, String), None);
        assert_eq!(PromotionPath::resolve(Int64, Float64), None);
        assert_eq!(PromotionPath::resolve(Int16, Float64), None);
    }
}
