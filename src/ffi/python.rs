// In: src/ffi/python.rs

use arrow::pyarrow::{PyArrowType, ToPyArrow};
use arrow::record_batch::RecordBatch;
use log::LevelFilter;
use pyo3::prelude::*;
use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::{Arc, Once};

use crate::bridge::{fill_record_batch_with_config, table_to_record_batch};
use crate::config::IngestConfig;
use crate::null_handling::NullPolicy;
use crate::table::{Schema, Table};
use crate::types::TambakDataType;

//==================================================================================
// I. Stateful Table API
//==================================================================================

#[pyclass(name = "Table", module = "tambak_ingest")]
pub struct PyTable {
    inner: Table,
    config: Arc<IngestConfig>,
}

#[pymethods]
impl PyTable {
    /// Creates an empty table from `[(name, dtype)]` pairs, e.g. `[("px", "float64")]`.
    /// `config_json` is an optional, possibly partial, `IngestConfig` object.
    #[new]
    #[pyo3(signature = (columns, config_json = None))]
    fn new(columns: Vec<(String, String)>, config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => IngestConfig::from_json(json)?,
            None => IngestConfig::default(),
        };
        let fields = columns
            .into_iter()
            .map(|(name, dtype)| Ok((name, TambakDataType::from_str(&dtype)?)))
            .collect::<PyResult<Vec<_>>>()?;
        Ok(Self {
            inner: Table::new(&Schema::new(fields))?,
            config: Arc::new(config),
        })
    }

    /// Fills the table from a `pyarrow.RecordBatch` and returns the fill report as JSON.
    #[pyo3(signature = (batch, index = "", offset = 0, limit = 0, is_update = false))]
    fn fill(
        &mut self,
        batch: PyArrowType<RecordBatch>,
        index: &str,
        offset: u32,
        limit: u32,
        is_update: bool,
    ) -> PyResult<String> {
        let report = fill_record_batch_with_config(
            &mut self.inner,
            &batch.0,
            index,
            offset,
            limit,
            NullPolicy::from_is_update(is_update),
            self.config.clone(),
        )?;
        Ok(report.to_json()?)
    }

    /// Exports the whole table as a `pyarrow.RecordBatch`.
    fn to_pyarrow(&self, py: Python) -> PyResult<PyObject> {
        table_to_record_batch(&self.inner)?.to_pyarrow(py)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    /// The current `[(name, dtype)]` layout, reflecting promotions.
    fn schema(&self) -> Vec<(String, String)> {
        self.inner
            .schema()
            .iter()
            .map(|f| (f.name.clone(), f.dtype.to_string()))
            .collect()
    }
}

//==================================================================================
// II. Logging
//==================================================================================

static INIT_LOGGER: Once = Once::new();

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(&filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => eprintln!("tambak: cannot open log file {}: {}; logging to stderr", filename, e),
            }
        }

        let _ = builder.try_init();
    });
}
