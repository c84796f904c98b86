//! Materializes the pkey / okey columns after the data columns are filled.

use crate::config::IngestConfig;
use crate::error::TambakError;
use crate::table::{Column, Table};
use crate::types::TambakDataType;

/// `(row + offset) mod limit`. A `limit` of zero means the key space is unbounded.
pub fn synthetic_key(row: usize, offset: u32, limit: u32) -> i64 {
    let key = row as u64 + u64::from(offset);
    let key = if limit == 0 { key } else { key % u64::from(limit) };
    key as i64
}

/// Writes synthesized pkey and okey columns covering `[0, rows)`.
pub(crate) fn synthesize_keys(
    table: &mut Table,
    rows: usize,
    offset: u32,
    limit: u32,
    config: &IngestConfig,
) -> Result<(), TambakError> {
    let mut pkey = Column::new(config.pkey_column.as_str(), TambakDataType::Int64, table.size());
    for row in 0..rows.min(table.size()) {
        pkey.set_nth(row, synthetic_key(row, offset, limit))?;
    }
    table.add_or_replace_column(pkey);
    table.clone_column(&config.pkey_column, &config.okey_column)?;
    Ok(())
}

/// Clones an existing column into both pkey and okey.
pub(crate) fn clone_index(table: &mut Table, index: &str, config: &IngestConfig) -> Result<(), TambakError> {
    table.clone_column(index, &config.pkey_column)?;
    table.clone_column(index, &config.okey_column)?;
    Ok(())
}
