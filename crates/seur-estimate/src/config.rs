//! Estimator configuration.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use seur_commerce::ShippingAddress;

/// Deployment root of the SEUR pricing API.
pub const DEFAULT_BASE_URL: &str = "https://z788h4e4ed.execute-api.us-east-2.amazonaws.com/DeployProd";

/// Path of the shipping calculator under [`DEFAULT_BASE_URL`].
pub const SHIPPING_CALCULATOR_PATH: &str = "/checkout-shipping";

/// Pricing service used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://z788h4e4ed.execute-api.us-east-2.amazonaws.com/DeployProd/checkout-shipping";

/// Language of customer-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

/// Rates used by the local fallback rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRates {
    /// Flat cost per shipment.
    #[serde(default = "default_base_cost")]
    pub base_cost: f64,

    /// Surcharge per kilogram.
    #[serde(default = "default_per_kg_cost")]
    pub per_kg_cost: f64,

    /// Assumed weight of one unit in kilograms.
    #[serde(default = "default_unit_weight")]
    pub unit_weight: f64,
}

fn default_base_cost() -> f64 {
    15.0
}

fn default_per_kg_cost() -> f64 {
    1.5
}

fn default_unit_weight() -> f64 {
    1.0
}

impl Default for FallbackRates {
    fn default() -> Self {
        Self {
            base_cost: default_base_cost(),
            per_kg_cost: default_per_kg_cost(),
            unit_weight: default_unit_weight(),
        }
    }
}

/// Estimator configuration. Immutable once handed to the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Remote pricing endpoint; `None` always uses the local rule.
    ///
    /// Written as `endpoint = ""` when absent so an offline configuration
    /// survives a save and reload.
    #[serde(
        default = "default_endpoint",
        serialize_with = "serialize_endpoint",
        deserialize_with = "deserialize_endpoint"
    )]
    pub endpoint: Option<String>,

    /// Order total at or above which shipping is free.
    #[serde(default = "default_threshold")]
    pub free_shipping_threshold: f64,

    /// Remote request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum time between health checks of the pricing service.
    #[serde(default = "default_health_check_interval_ms")]
    pub health_check_interval_ms: u64,

    /// Message language.
    #[serde(default)]
    pub language: Language,

    /// Destination sent to the pricing service.
    #[serde(default)]
    pub address: ShippingAddress,

    /// Local fallback rates.
    #[serde(default)]
    pub rates: FallbackRates,
}

fn default_endpoint() -> Option<String> {
    Some(DEFAULT_ENDPOINT.to_string())
}

fn serialize_endpoint<S: Serializer>(endpoint: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(endpoint.as_deref().unwrap_or(""))
}

fn deserialize_endpoint<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let endpoint = Option::<String>::deserialize(deserializer)?;
    Ok(endpoint.filter(|e| !e.trim().is_empty()))
}

fn default_health_check_interval_ms() -> u64 {
    60_000
}

fn default_threshold() -> f64 {
    50.0
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl EstimatorConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Health check interval as a duration.
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    /// Same configuration without a remote endpoint.
    pub fn offline(mut self) -> Self {
        self.endpoint = None;
        self
    }

    /// Set the remote endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the free-shipping threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.free_shipping_threshold = threshold;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the health check interval.
    pub fn with_health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval_ms = interval.as_millis() as u64;
        self
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            free_shipping_threshold: default_threshold(),
            timeout_ms: default_timeout_ms(),
            language: Language::default(),
            address: ShippingAddress::default(),
            health_check_interval_ms: default_health_check_interval_ms(),
            rates: FallbackRates::default(),
        }
    }
}
