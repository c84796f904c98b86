// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the Arrow-facing boundary of the library. The fill pipeline
// only knows the `SourceAccessor` trait and the `Table`; this layer adapts Arrow
// data to the former and exports the latter.
//
// Data Flow (Ingest):
//
//   1. [Stateless API (create_table / fill_record_batch)] -> Receives `&RecordBatch`
//         |
//         `-> a. Wraps it in `ArrowSource` (a `SourceAccessor`)
//         |
//         `-> b. Calls `fill_pipeline::Loader::fill_table`
//
//   2. [Pipeline Engine (fill_pipeline)] -> Mutates the `Table`, returns a `FillReport`
//
// Data Flow (Export):
//
//   1. [arrow_export::table_to_record_batch] -> Receives `&Table`
//         |
//         `-> Returns a `RecordBatch` with validity mapped to null buffers
//
// ====================================================================================
pub mod arrow_export;
pub mod arrow_source;
pub mod stateless_api;

// --- Source Adapter ---
pub use arrow_source::ArrowSource;

// --- Low-Level Stateless API (for FFI and testing) ---
pub use arrow_export::{column_to_array, table_to_record_batch};
pub use stateless_api::{
    create_table, create_table_with_config, fill_record_batch, fill_record_batch_with_config,
};
