//! Extraction error types.

use thiserror::Error;

/// Configuration errors raised while building an extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A configured CSS selector does not parse.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// No container selectors were configured.
    #[error("No cart item container selectors configured")]
    NoContainers,
}

/// Why a single cart-item container was dropped.
///
/// Rejections never abort extraction; the item is skipped and the scan
/// continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemRejection {
    /// No element matched any name selector.
    #[error("missing name element")]
    MissingName,

    /// No element matched any price selector.
    #[error("missing price element")]
    MissingPrice,

    /// Price text did not contain a number.
    #[error("unparsable price '{0}'")]
    UnparsablePrice(String),

    /// Price parsed to zero or less.
    #[error("non-positive price {0}")]
    NonPositivePrice(f64),

    /// Quantity element present but not a positive integer.
    #[error("unparsable quantity '{0}'")]
    UnparsableQuantity(String),
}
