//! Foreign-function bindings. Compiled only with the `python` feature.

#[cfg(feature = "python")]
pub mod python;
