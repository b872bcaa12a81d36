//! Estimation error types.

use std::time::Duration;

use thiserror::Error;

/// Errors on the remote estimation path.
///
/// None of these reach callers of
/// [`ShippingEstimator::estimate`](crate::ShippingEstimator::estimate); they
/// select the local fallback instead.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// No endpoint configured.
    #[error("Remote estimation disabled")]
    Disabled,

    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status.
    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// Service answered with `success: false`.
    #[error("Pricing service rejected the request: {0}")]
    Rejected(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EstimateError {
    /// Whether the error means the pricing service could not be used at all,
    /// as opposed to a reachable service declining this cart.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::Disabled | Self::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unavailable() {
        assert!(EstimateError::Timeout(Duration::from_secs(1)).is_unavailable());
        assert!(EstimateError::Server {
            status: 503,
            body: String::new()
        }
        .is_unavailable());
        assert!(!EstimateError::Rejected("postal code required".to_string()).is_unavailable());
        assert!(!EstimateError::Disabled.is_unavailable());
    }
}
