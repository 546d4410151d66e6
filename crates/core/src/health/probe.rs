use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Health status reported by a probe, also used as the failure status of a registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Unhealthy,
    Degraded,
    Healthy,
}

impl HealthStatus {
    /// Check if the status indicates the instance is healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Outcome of a single probe execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub description: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn healthy() -> Self {
        Self::new(HealthStatus::Healthy, None)
    }

    pub fn unhealthy(description: impl Into<String>) -> Self {
        Self::new(HealthStatus::Unhealthy, Some(description.into()))
    }

    pub fn new(status: HealthStatus, description: Option<String>) -> Self {
        Self {
            status,
            description,
            checked_at: Utc::now(),
        }
    }
}

/// A health probe constructed by a provider for one instance.
///
/// The registration engine only builds probes through factories; executing
/// them is the job of the health-check subsystem.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> HealthReport;
}

/// Re-uses the last report of the wrapped probe until `ttl` elapses
pub struct CachedHealthProbe {
    inner: Box<dyn HealthProbe>,
    ttl: Duration,
    last: Mutex<Option<(Instant, HealthReport)>>,
}

impl CachedHealthProbe {
    pub fn new(inner: Box<dyn HealthProbe>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            last: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl HealthProbe for CachedHealthProbe {
    async fn check(&self) -> HealthReport {
        // Held across the inner check so concurrent callers share one execution
        let mut last = self.last.lock().await;
        if let Some((at, report)) = last.as_ref() {
            if at.elapsed() < self.ttl {
                return report.clone();
            }
        }

        let report = self.inner.check().await;
        *last = Some((Instant::now(), report.clone()));
        report
    }
}

impl std::fmt::Debug for CachedHealthProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedHealthProbe")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
