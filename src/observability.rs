//! Structured diagnostics for the fill pipeline.
//!
//! `log_metric!` emits one key/value line per pipeline decision (bulk vs
//! iterative, promotions) through the `log` facade at debug level. The
//! `#[cfg(debug_assertions)]` guard compiles every call out of release builds.

/// Logs a structured key-value metric line, only in debug builds.
///
/// # Example
/// ```
/// use tambak_ingest::log_metric;
/// let rows = 4;
/// log_metric!("event" = "fill_column", "path" = "bulk", "rows" = &rows);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("TAMBAK_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
