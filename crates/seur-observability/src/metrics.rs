//! Monitor counters.

use std::time::Duration;

use serde::Serialize;
use seur_commerce::EstimateMethod;

/// Counters kept by the monitoring loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorMetrics {
    /// Extraction passes run.
    pub passes: u64,
    /// Passes that found no cart on the page.
    pub misses: u64,
    /// Passes whose snapshot differed from the previous one.
    pub changes: u64,
    /// Estimates produced by the remote service.
    pub remote_estimates: u64,
    /// Estimates produced by the local rule.
    pub local_estimates: u64,
    /// Estimates discarded because a newer snapshot arrived meanwhile.
    pub stale_discarded: u64,
    /// Duration of the last estimate in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_estimate_ms: Option<u64>,
}

impl MonitorMetrics {
    /// Create empty counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an extraction pass; `found` is false when no cart was present.
    pub fn record_pass(&mut self, found: bool) {
        self.passes += 1;
        if !found {
            self.misses += 1;
        }
    }

    /// Record a detected cart change.
    pub fn record_change(&mut self) {
        self.changes += 1;
    }

    /// Record a finished estimate.
    pub fn record_estimate(&mut self, method: EstimateMethod, elapsed: Duration) {
        match method {
            EstimateMethod::Remote => self.remote_estimates += 1,
            EstimateMethod::Local => self.local_estimates += 1,
        }
        self.last_estimate_ms = Some(elapsed.as_millis() as u64);
    }

    /// Record a result dropped as stale.
    pub fn record_stale(&mut self) {
        self.stale_discarded += 1;
    }

    /// Total estimates delivered.
    pub fn estimates(&self) -> u64 {
        self.remote_estimates + self.local_estimates
    }

    /// Share of estimates that came from the local rule, 0.0 to 1.0.
    pub fn fallback_ratio(&self) -> f64 {
        match self.estimates() {
            0 => 0.0,
            n => self.local_estimates as f64 / n as f64,
        }
    }
}
