//! Destination address sent to the pricing service.

use serde::{Deserialize, Serialize};

/// Country code used when no destination is configured.
pub const DEFAULT_COUNTRY_CODE: &str = "ES";

/// A minimal shipping destination.
///
/// Missing fields deserialize to empty strings; an incomplete address is
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// ISO country code (e.g., "ES").
    #[serde(default)]
    pub country_code: String,
    /// City name.
    #[serde(default)]
    pub city: String,
    /// Postal code.
    #[serde(default)]
    pub postal_code: String,
}

impl ShippingAddress {
    /// Create a new address.
    pub fn new(
        country_code: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Check if every field is filled in.
    pub fn is_complete(&self) -> bool {
        !self.country_code.is_empty() && !self.city.is_empty() && !self.postal_code.is_empty()
    }

    /// Format as a single line, skipping empty parts.
    pub fn one_line(&self) -> String {
        [&self.postal_code, &self.city, &self.country_code]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CODE, "", "")
    }
}
