// In: src/fill_pipeline/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Fill Pipeline
// ====================================================================================
//
// Data Flow (one `fill_table` call):
//
//   1. [Loader::with_config]   -> resolver: source native types -> dtypes (once)
//
//   2. For each input-schema column:
//         |
//         `-> a. bulk: typed slice copy if the layouts provably match
//         |       `-> null_handling::apply_null_indices
//         |
//         `-> b. iterative: per-row dispatch on the column's current dtype
//                 `-> promote: re-bind the column, retry the same row
//
//   3. index: pkey / okey from the sentinel, an explicit column, or synthesized
//
// ====================================================================================

pub mod bulk;
pub mod index;
pub(crate) mod iterative;
pub mod orchestrator;
pub mod promote;
pub mod report;
pub mod resolver;

pub use bulk::FillStatus;
pub use orchestrator::Loader;
pub use promote::PromotionPath;
pub use report::{ColumnReport, FillPath, FillReport, Promotion};

use crate::config::IngestConfig;
use crate::null_handling::NullPolicy;

/// Per-call state shared by every column of one fill.
pub(crate) struct FillContext<'a> {
    pub policy: NullPolicy,
    pub config: &'a IngestConfig,
}

#[cfg(test)]
mod orchestrator_tests;
