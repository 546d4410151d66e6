use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden_core::{HealthProbe, HealthReport, HealthStatus};

/// Probe that always reports the same status
#[derive(Debug, Clone)]
pub struct StaticProbe {
    status: HealthStatus,
    checks: Arc<AtomicUsize>,
}

impl StaticProbe {
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status,
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn healthy() -> Self {
        Self::new(HealthStatus::Healthy)
    }

    /// Handle counting how often the probe ran
    pub fn check_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.checks)
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn check(&self) -> HealthReport {
        self.checks.fetch_add(1, Ordering::SeqCst);
        HealthReport::new(self.status, None)
    }
}
