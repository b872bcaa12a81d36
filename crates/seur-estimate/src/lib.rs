//! Shipping estimation for cart snapshots.
//!
//! This crate provides:
//! - `EstimatorConfig` - Endpoint, threshold, timeout, language, destination
//! - `RemoteClient` - Client for the remote pricing service
//! - `local_estimate` - Deterministic fallback rule
//! - `ShippingEstimator` - Tries the remote path, falls back locally, never fails
//! - `HealthTracker` - Skips the remote service for a while after it fails
//! - `ShippingQuoter` - Async seam used by the monitor

mod config;
mod error;
mod estimator;
mod fallback;
mod health;
mod remote;

pub use config::*;
pub use error::*;
pub use estimator::*;
pub use fallback::*;
pub use health::*;
pub use remote::*;
