//! Shipping estimate produced for a cart snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::format_euros;

/// Which path produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMethod {
    /// Returned by the remote pricing service.
    Remote,
    /// Computed locally after the remote path failed or was skipped.
    Local,
}

impl EstimateMethod {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for EstimateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipping cost estimate for one cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingEstimate {
    /// Shipping cost in euros; zero when shipping is free.
    pub cost: f64,
    /// Whether the free-shipping threshold was reached.
    pub is_free_shipping: bool,
    /// Customer-facing message.
    pub message: String,
    /// Total parcel weight in kilograms.
    pub total_weight: f64,
    /// Number of parcels; at least one.
    pub parcel_count: u32,
    /// Provenance of the estimate.
    pub method: EstimateMethod,
    /// Calculation label reported by the producer (e.g. "fallback").
    pub calculation_method: String,
    /// Amount still missing to reach free shipping; zero once reached.
    pub remaining_for_free: f64,
}

impl ShippingEstimate {
    /// Cost as a display string, "0.00€" when free.
    pub fn cost_display(&self) -> String {
        format_euros(self.cost)
    }

    /// Check if this estimate came from the local fallback.
    pub fn is_fallback(&self) -> bool {
        self.method == EstimateMethod::Local
    }
}
