// In: src/config.rs

//! The single source of truth for ingestion configuration.
//!
//! `IngestConfig` is created once at the application boundary (from JSON or a
//! Python caller) and passed down through the fill pipeline as a shared,
//! read-only `Arc<IngestConfig>`.

use serde::{Deserialize, Serialize};

use crate::error::TambakError;

//==================================================================================
// I. The Unified IngestConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct IngestConfig {
    /// Source column name that, when present in the input schema, supplies the
    /// row identity directly.
    #[serde(default = "default_index_sentinel")]
    pub index_sentinel: String,

    /// Name of the identity key column every table carries.
    #[serde(default = "default_pkey_column")]
    pub pkey_column: String,

    /// Name of the insertion-order key column every table carries.
    #[serde(default = "default_okey_column")]
    pub okey_column: String,

    /// Multiplier applied to raw integer timestamps to reach milliseconds.
    /// The default assumes sources deliver whole seconds.
    #[serde(default = "default_time_scale_factor")]
    pub time_scale_factor: i64,

    /// When false, every column goes through the iterative path.
    #[serde(default = "default_true")]
    pub enable_bulk_copy: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            index_sentinel: default_index_sentinel(),
            pkey_column: default_pkey_column(),
            okey_column: default_okey_column(),
            time_scale_factor: default_time_scale_factor(),
            enable_bulk_copy: true,
        }
    }
}

impl IngestConfig {
    /// Parses a (possibly partial) JSON object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TambakError> {
        let config: IngestConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TambakError> {
        if self.time_scale_factor <= 0 {
            return Err(TambakError::ConfigError(format!(
                "time_scale_factor must be positive, got {}",
                self.time_scale_factor
            )));
        }
        if self.pkey_column.is_empty() || self.okey_column.is_empty() {
            return Err(TambakError::ConfigError(
                "key column names must not be empty".to_string(),
            ));
        }
        if self.pkey_column == self.okey_column {
            return Err(TambakError::ConfigError(format!(
                "pkey and okey must be distinct columns, both are '{}'",
                self.pkey_column
            )));
        }
        Ok(())
    }
}

//==================================================================================
// II. Serde Default Helpers
//==================================================================================

fn default_index_sentinel() -> String {
    "__INDEX__".to_string()
}

fn default_pkey_column() -> String {
    "psp_pkey".to_string()
}

fn default_okey_column() -> String {
    "psp_okey".to_string()
}

fn default_time_scale_factor() -> i64 {
    1_000
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}
