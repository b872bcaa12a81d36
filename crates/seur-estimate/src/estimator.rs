//! Shipping estimator: remote first, local fallback always available.

use std::sync::Arc;

use async_trait::async_trait;
use seur_commerce::{CartSnapshot, ShippingEstimate};
use tracing::{debug, warn};

use crate::config::EstimatorConfig;
use crate::error::EstimateError;
use crate::fallback::{local_estimate, remaining_for_free};
use crate::health::{HealthStatus, HealthTracker};
use crate::remote::RemoteClient;

/// Anything that can price shipping for a cart snapshot.
///
/// Implementations must not fail; degraded results are expressed through
/// [`ShippingEstimate::method`].
#[async_trait]
pub trait ShippingQuoter: Send + Sync {
    /// Estimate shipping for `cart`.
    async fn estimate(&self, cart: &CartSnapshot) -> ShippingEstimate;

    /// Health of the remote pricing service, if there is one.
    fn health(&self) -> Option<HealthStatus> {
        None
    }
}

/// Estimator backed by the remote pricing service and the local rule.
///
/// Clones share one health record, so a failure seen by one clone also holds
/// the others back until the check interval has passed.
#[derive(Debug, Clone)]
pub struct ShippingEstimator {
    config: EstimatorConfig,
    remote: Option<RemoteClient>,
    health: Option<Arc<HealthTracker>>,
}

impl ShippingEstimator {
    /// Create an estimator. An absent or empty endpoint disables the remote path.
    pub fn new(config: EstimatorConfig) -> Result<Self, EstimateError> {
        let remote = match config.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => {
                Some(RemoteClient::new(endpoint, config.timeout())?)
            }
            _ => None,
        };
        let health = remote
            .as_ref()
            .map(|r| Arc::new(HealthTracker::new(r.endpoint(), config.health_check_interval())));
        Ok(Self {
            config,
            remote,
            health,
        })
    }

    /// The estimator configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Whether a remote endpoint is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Current health of the pricing service; `None` when running offline.
    pub fn health(&self) -> Option<HealthStatus> {
        self.health.as_ref().map(|h| h.status())
    }

    /// Estimate via the remote service only. Ignores and does not update
    /// the health record.
    pub async fn remote_estimate(&self, cart: &CartSnapshot) -> Result<ShippingEstimate, EstimateError> {
        let remote = self.remote.as_ref().ok_or(EstimateError::Disabled)?;
        let quote = remote.quote(cart, &self.config.address).await?;
        let remaining = remaining_for_free(cart.total(), self.config.free_shipping_threshold);
        Ok(quote.into_estimate(remaining))
    }

    /// Estimate shipping, substituting the local rule on any remote failure.
    ///
    /// After the service has been found unavailable, the remote call is
    /// skipped until the health check interval has passed.
    pub async fn estimate(&self, cart: &CartSnapshot) -> ShippingEstimate {
        let Some(health) = &self.health else {
            debug!("no pricing endpoint configured, using local estimate");
            return local_estimate(cart, &self.config);
        };
        if !health.should_attempt() {
            debug!("pricing service unhealthy, using local estimate");
            return local_estimate(cart, &self.config);
        }

        match self.remote_estimate(cart).await {
            Ok(estimate) => {
                health.record_success();
                estimate
            }
            Err(e) => {
                if e.is_unavailable() {
                    health.record_failure(&e);
                } else {
                    health.record_success();
                }
                warn!(error = %e, "remote estimate failed, using local fallback");
                local_estimate(cart, &self.config)
            }
        }
    }
}

#[async_trait]
impl ShippingQuoter for ShippingEstimator {
    async fn estimate(&self, cart: &CartSnapshot) -> ShippingEstimate {
        ShippingEstimator::estimate(self, cart).await
    }

    fn health(&self) -> Option<HealthStatus> {
        ShippingEstimator::health(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_endpoint_disables_remote() {
        let mut config = EstimatorConfig::default();
        config.endpoint = Some("  ".to_string());
        assert!(!ShippingEstimator::new(config).unwrap().has_remote());
        assert!(!ShippingEstimator::new(EstimatorConfig::default().offline())
            .unwrap()
            .has_remote());
        assert!(ShippingEstimator::new(EstimatorConfig::default()).unwrap().has_remote());
    }

    #[test]
    fn test_health_only_with_remote() {
        let offline = ShippingEstimator::new(EstimatorConfig::default().offline()).unwrap();
        assert!(offline.health().is_none());

        let online = ShippingEstimator::new(EstimatorConfig::default()).unwrap();
        let status = online.health().unwrap();
        assert_eq!(status.state, crate::HealthState::Unknown);
        assert_eq!(status.endpoint, crate::DEFAULT_ENDPOINT);
        assert_eq!(status.check_interval_ms, 60_000);
    }
}
