// In: src/bridge/stateless_api.rs

use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::bridge::arrow_source::ArrowSource;
use crate::config::IngestConfig;
use crate::error::TambakError;
use crate::fill_pipeline::{FillReport, Loader};
use crate::null_handling::NullPolicy;
use crate::table::{Schema, Table};

/// Builds a table whose layout is the resolved schema of `batch` and runs the
/// creation fill (insert policy, keys synthesized from row 0 unless `index` is set).
pub fn create_table(batch: &RecordBatch, index: &str) -> Result<(Table, FillReport), TambakError> {
    create_table_with_config(batch, index, Arc::new(IngestConfig::default()))
}

pub fn create_table_with_config(
    batch: &RecordBatch,
    index: &str,
    config: Arc<IngestConfig>,
) -> Result<(Table, FillReport), TambakError> {
    let loader = Loader::with_config(ArrowSource::new(batch.clone())?, config)?;
    let input_schema = loader.resolved_schema();

    // The sentinel never becomes a data column; it feeds the key columns.
    let sentinel = loader.config().index_sentinel.as_str();
    let table_schema = Schema::new(
        input_schema
            .iter()
            .filter(|f| f.name != sentinel)
            .map(|f| (f.name.clone(), f.dtype)),
    );

    let mut table = Table::new(&table_schema)?;
    let report = loader.fill_table(&mut table, &input_schema, index, 0, 0, NullPolicy::Insert)?;
    Ok((table, report))
}

/// Fills an existing table from `batch`. Every batch column must already exist
/// in `table`; its current dtype is the declared one.
pub fn fill_record_batch(
    table: &mut Table,
    batch: &RecordBatch,
    index: &str,
    offset: u32,
    limit: u32,
    policy: NullPolicy,
) -> Result<FillReport, TambakError> {
    fill_record_batch_with_config(table, batch, index, offset, limit, policy, Arc::new(IngestConfig::default()))
}

pub fn fill_record_batch_with_config(
    table: &mut Table,
    batch: &RecordBatch,
    index: &str,
    offset: u32,
    limit: u32,
    policy: NullPolicy,
    config: Arc<IngestConfig>,
) -> Result<FillReport, TambakError> {
    let loader = Loader::with_config(ArrowSource::new(batch.clone())?, config)?;
    let input_schema = loader.resolved_schema();
    loader.fill_table(table, &input_schema, index, offset, limit, policy)
}
