//! Health tracking for the remote pricing service.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Last known state of the pricing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// No request has completed yet.
    #[default]
    Unknown,
    /// The last request succeeded.
    Healthy,
    /// The last request failed; remote calls are skipped until the next check.
    Unhealthy,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Snapshot of the pricing service health, safe to hand to presenters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub endpoint: String,
    pub last_check: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub check_interval_ms: u64,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.state != HealthState::Unhealthy
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: HealthState,
    checked: Option<Instant>,
    last_check: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Records remote outcomes and decides when the service may be called again.
///
/// A failure marks the service unhealthy for `interval`; after that the next
/// estimate tries the service again and its outcome becomes the new state.
#[derive(Debug)]
pub struct HealthTracker {
    endpoint: String,
    interval: Duration,
    inner: Mutex<Inner>,
}

impl HealthTracker {
    pub fn new(endpoint: impl Into<String>, interval: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            interval,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Whether a remote call should be attempted now.
    pub fn should_attempt(&self) -> bool {
        let inner = self.lock();
        match (inner.state, inner.checked) {
            (HealthState::Unhealthy, Some(checked)) => checked.elapsed() >= self.interval,
            _ => true,
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.state = HealthState::Healthy;
        inner.checked = Some(Instant::now());
        inner.last_check = Some(Utc::now());
        inner.last_error = None;
    }

    pub fn record_failure(&self, error: impl ToString) {
        let mut inner = self.lock();
        inner.state = HealthState::Unhealthy;
        inner.checked = Some(Instant::now());
        inner.last_check = Some(Utc::now());
        inner.last_error = Some(error.to_string());
    }

    pub fn status(&self) -> HealthStatus {
        let inner = self.lock();
        HealthStatus {
            state: inner.state,
            endpoint: self.endpoint.clone(),
            last_check: inner.last_check,
            last_error: inner.last_error.clone(),
            check_interval_ms: self.interval.as_millis() as u64,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
