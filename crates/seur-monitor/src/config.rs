//! Monitor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use seur_commerce::ComparisonMode;

/// Monitoring loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Interval between polling passes in milliseconds.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Quiet window used to coalesce mutation and commerce notifications.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How consecutive snapshots are compared.
    #[serde(default)]
    pub comparison: ComparisonMode,

    /// Capacity of the trigger channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_update_interval_ms() -> u64 {
    2000
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_channel_capacity() -> usize {
    64
}

impl MonitorConfig {
    /// Polling interval.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.max(1))
    }

    /// Debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            debounce_ms: default_debounce_ms(),
            comparison: ComparisonMode::default(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
