//! This module defines the core, strongly-typed data representations used
//! throughout the tambak ingestion core.
//!
//! It includes the canonical `TambakDataType` enum (the dtype tag every column
//! carries) and the `Scalar` value exchanged with source accessors.

pub mod scalar;
pub mod tambak_data_type;

// Re-export the main type(s) for easier access.
pub use scalar::{DateParts, Scalar};
pub use tambak_data_type::TambakDataType;
