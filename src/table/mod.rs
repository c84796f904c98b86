// In: src/table/mod.rs

//! The destination of every fill: an ordered set of uniquely-named, equal-length
//! columns.
//!
//! The table is the exclusive owner of its columns. A fill borrows it mutably for
//! its whole duration; only short-lived borrows of individual columns ever leave
//! this module.

use hashbrown::HashMap;

use crate::error::TambakError;
use crate::fill_pipeline::promote::PromotionPath;
use crate::types::TambakDataType;

pub mod column;
pub mod schema;

pub use column::{Column, ColumnData};
pub use schema::{Schema, SchemaField};

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    size: usize,
}

impl Table {
    /// An empty (zero-row) table with one never-set column per schema field.
    pub fn new(schema: &Schema) -> Result<Self, TambakError> {
        Self::with_rows(schema, 0)
    }

    pub fn with_rows(schema: &Schema, rows: usize) -> Result<Self, TambakError> {
        let mut table = Table {
            columns: Vec::with_capacity(schema.len()),
            index: HashMap::with_capacity(schema.len()),
            size: rows,
        };
        for field in schema.iter() {
            table.add_column(Column::new(field.name.as_str(), field.dtype, rows))?;
        }
        Ok(table)
    }

    /// Number of rows in every column.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The table's current layout, reflecting any promotions so far.
    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(|c| (c.name().to_string(), c.dtype())))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn column_at(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn column_mut(&mut self, idx: usize) -> Result<&mut Column, TambakError> {
        let count = self.columns.len();
        self.columns.get_mut(idx).ok_or_else(|| {
            TambakError::InternalError(format!(
                "Column slot {} requested from a table of {} columns",
                idx, count
            ))
        })
    }

    /// Appends a column. Its length is adjusted to the table's row count.
    pub fn add_column(&mut self, mut column: Column) -> Result<usize, TambakError> {
        if self.index.contains_key(column.name()) {
            return Err(TambakError::DuplicateColumn(column.name().to_string()));
        }
        if column.len() != self.size {
            column.resize(self.size);
        }
        let idx = self.columns.len();
        self.index.insert(column.name().to_string(), idx);
        self.columns.push(column);
        Ok(idx)
    }

    /// Adds `column`, replacing (in place) any existing column of the same name.
    pub fn add_or_replace_column(&mut self, mut column: Column) -> usize {
        if column.len() != self.size {
            column.resize(self.size);
        }
        match self.index.get(column.name()) {
            Some(&idx) => {
                self.columns[idx] = column;
                idx
            }
            None => {
                let idx = self.columns.len();
                self.index.insert(column.name().to_string(), idx);
                self.columns.push(column);
                idx
            }
        }
    }

    /// Copies column `src` byte-for-byte into a column named `dst` (added or replaced).
    pub fn clone_column(&mut self, src: &str, dst: &str) -> Result<usize, TambakError> {
        let copy = self
            .column(src)
            .ok_or_else(|| TambakError::missing_in_table(src))?
            .clone_as(dst);
        Ok(self.add_or_replace_column(copy))
    }

    /// Re-binds the column at `idx` under dtype `to`, converting rows `[0, row)`.
    ///
    /// Only the widening paths known to `PromotionPath` are accepted. The column
    /// keeps its name, position and length.
    pub fn promote_column(
        &mut self,
        idx: usize,
        to: TambakDataType,
        row: usize,
    ) -> Result<PromotionPath, TambakError> {
        let slot = self.column_mut(idx)?;
        let from = slot.dtype();
        let path = PromotionPath::resolve(from, to).ok_or_else(|| {
            TambakError::UnsupportedPromotion {
                column: slot.name().to_string(),
                from,
                to,
            }
        })?;

        let placeholder = Column::new(slot.name(), from, 0);
        let old = std::mem::replace(slot, placeholder);
        *slot = old.retype(to, row);
        Ok(path)
    }

    /// Grows or truncates every column to `rows`. New rows are never set.
    pub fn resize(&mut self, rows: usize) {
        for column in self.columns.iter_mut() {
            column.resize(rows);
        }
        self.size = rows;
    }
}
