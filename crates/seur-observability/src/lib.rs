//! Observability for the SEUR shipping estimator.
//!
//! This crate provides:
//! - `LogConfig` / `init_logging` - `tracing` subscriber setup (human or JSON)
//! - `MonitorMetrics` - Counters for extraction passes and estimates

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;
