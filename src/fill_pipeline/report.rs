//! The serializable outcome of a `fill_table` call.

use serde::{Deserialize, Serialize};

use crate::error::TambakError;
use crate::types::TambakDataType;

/// Which path filled a column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FillPath {
    Bulk,
    Iterative,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub column: String,
    pub from: TambakDataType,
    pub to: TambakDataType,
    /// The first row written under `to`.
    pub row: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnReport {
    pub column: String,
    pub path: FillPath,
    /// The column's dtype after the fill, including any promotion.
    pub dtype: TambakDataType,
    pub null_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
    pub promotions: Vec<Promotion>,
}

impl FillReport {
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.column == name)
    }

    pub fn promotions_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Promotion> + 'a {
        self.promotions.iter().filter(move |p| p.column == name)
    }

    pub fn to_json(&self) -> Result<String, TambakError> {
        Ok(serde_json::to_string(self)?)
    }
}
