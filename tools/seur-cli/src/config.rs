//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use seur_estimate::EstimatorConfig;
use seur_extract::SelectorConfig;
use seur_monitor::MonitorConfig;
use seur_observability::LogConfig;

/// File names searched for, in order, from the working directory upward.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["seur.toml", ".seur.toml", "seur.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Pricing service, threshold, address and fallback rates.
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// Cart selectors.
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Watch loop timing.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Terminal panel options.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// What the terminal panel shows besides the cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// List cart lines under the estimate.
    #[serde(default = "default_true")]
    pub show_product_details: bool,

    /// Show weight, parcels and calculation method.
    #[serde(default = "default_true")]
    pub show_shipping_details: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_product_details: true,
            show_shipping_details: true,
        }
    }
}

/// Generate a default seur.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# SEUR shipping estimator configuration

[estimator]
endpoint = "{endpoint}"
free_shipping_threshold = 50.0
timeout_ms = 10000
health_check_interval_ms = 60000
language = "es"

[estimator.address]
countryCode = "ES"
city = ""
postalCode = ""

[estimator.rates]
base_cost = 15.0
per_kg_cost = 1.5
unit_weight = 1.0

[selectors]
# containers = [".cart-item", "[data-cart-item]", ".sqs-cart-item"]
# price = [".item-price", ".cart-item-price"]

[monitor]
update_interval_ms = 2000
debounce_ms = 500
comparison = "positional"

[display]
show_product_details = true
show_shipping_details = true

[logging]
level = "info"
format = "human"
timestamps = true
"#,
        endpoint = seur_estimate::DEFAULT_ENDPOINT
    )
}
