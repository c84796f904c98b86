// In: src/fill_pipeline/orchestrator.rs

//! The top-level fill coordinator.
//!
//! `Loader` resolves a source's schema once on construction and then drives
//! `fill_table`: every input-schema column goes through the bulk path or the
//! iterative path, and the key columns are materialized last.

use std::sync::Arc;

use super::bulk::{try_bulk_copy, FillStatus};
use super::index::{clone_index, synthesize_keys};
use super::iterative::fill_iterative;
use super::report::{ColumnReport, FillPath, FillReport};
use super::resolver::resolve_schema;
use super::FillContext;
use crate::config::IngestConfig;
use crate::error::TambakError;
use crate::null_handling::{apply_null_indices, NullPolicy};
use crate::source::SourceAccessor;
use crate::table::{Column, Schema, Table};
use crate::types::TambakDataType;

pub struct Loader<S: SourceAccessor> {
    source: S,
    names: Vec<String>,
    types: Vec<TambakDataType>,
    config: Arc<IngestConfig>,
}

impl<S: SourceAccessor> Loader<S> {
    pub fn new(source: S) -> Result<Self, TambakError> {
        Self::with_config(source, Arc::new(IngestConfig::default()))
    }

    /// Resolves every source column up front, so a nested column fails here
    /// before any table is touched.
    pub fn with_config(source: S, config: Arc<IngestConfig>) -> Result<Self, TambakError> {
        config.validate()?;
        let (names, types) = resolve_schema(&source.schema())?;
        log::debug!("Resolved {} source columns: {:?}", names.len(), types);
        Ok(Self {
            source,
            names,
            types,
            config,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[TambakDataType] {
        &self.types
    }

    pub fn row_count(&self) -> usize {
        self.source.row_count()
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// The resolved source schema, for creating a table that matches it.
    pub fn resolved_schema(&self) -> Schema {
        Schema::new(self.names.iter().cloned().zip(self.types.iter().copied()))
    }

    /// Fills `table` from the source.
    ///
    /// The table is resized to the source's row count. Columns are filled in
    /// `input_schema` order; a fatal error leaves earlier columns written.
    /// `index` names an existing column to use as the row identity, or is empty
    /// to synthesize keys as `(row + offset) mod limit`.
    pub fn fill_table(
        &self,
        table: &mut Table,
        input_schema: &Schema,
        index: &str,
        offset: u32,
        limit: u32,
        policy: NullPolicy,
    ) -> Result<FillReport, TambakError> {
        let rows = self.row_count();
        table.resize(rows);

        let ctx = FillContext {
            policy,
            config: &self.config,
        };
        let mut report = FillReport {
            rows,
            ..FillReport::default()
        };
        let mut sentinel_seen = false;

        for field in input_schema.iter() {
            if field.name == self.config.index_sentinel {
                let pkey = Column::new(self.config.pkey_column.as_str(), field.dtype, rows);
                let idx = table.add_or_replace_column(pkey);
                let column_report = self.fill_column(table, idx, &field.name, &ctx, &mut report)?;
                report.columns.push(column_report);
                table.clone_column(&self.config.pkey_column, &self.config.okey_column)?;
                sentinel_seen = true;
                continue;
            }

            let idx = table
                .column_index(&field.name)
                .ok_or_else(|| TambakError::missing_in_table(&field.name))?;
            let column_report = self.fill_column(table, idx, &field.name, &ctx, &mut report)?;
            report.columns.push(column_report);
        }

        if !sentinel_seen {
            if index.is_empty() {
                synthesize_keys(table, rows, offset, limit, &self.config)?;
            } else {
                clone_index(table, index, &self.config)?;
            }
        }

        log::info!(
            "Filled {} columns over {} rows ({} promotions)",
            report.columns.len(),
            rows,
            report.promotions.len()
        );
        Ok(report)
    }

    /// Fills table column `idx` from source column `source_name`.
    fn fill_column(
        &self,
        table: &mut Table,
        idx: usize,
        source_name: &str,
        ctx: &FillContext<'_>,
        report: &mut FillReport,
    ) -> Result<ColumnReport, TambakError> {
        let src_idx = self
            .names
            .iter()
            .position(|n| n == source_name)
            .ok_or_else(|| TambakError::missing_in_source(source_name))?;
        let source_dtype = self.types[src_idx];
        let declared = table.column_mut(idx)?.dtype();
        let bulk = self.source.bulk_column(source_name, declared)?;

        let column = table.column_mut(idx)?;
        let path = match try_bulk_copy(column, source_dtype, &bulk, ctx.config)? {
            FillStatus::Succeed => {
                let (_, validity) = column.parts_mut();
                apply_null_indices(validity, &bulk.null_indices, ctx.policy)?;
                FillPath::Bulk
            }
            FillStatus::Fail => {
                fill_iterative(table, idx, &self.source, src_idx, &bulk, ctx, report)?;
                FillPath::Iterative
            }
        };

        let column = table.column_mut(idx)?;
        log_metric!(
            "event" = "fill_column",
            "column" = column.name(),
            "path" = format!("{:?}", path),
            "declared" = declared,
            "final" = column.dtype()
        );
        Ok(ColumnReport {
            column: column.name().to_string(),
            path,
            dtype: column.dtype(),
            null_count: column.validity().null_count(),
        })
    }
}
