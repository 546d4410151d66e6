//! Health probe tuning for a single instance

use crate::health::{effective_timeout, HealthStatus};
use serde::{Deserialize, Serialize};
use service_builder::builder;
use std::time::Duration;

/// Health-probe options, consulted only when the instance enables health checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder]
#[serde(default)]
pub struct HealthOptions {
    /// Tag the probe as part of the readiness set
    #[builder(default = "false", getter)]
    pub include_in_readiness_check: bool,

    /// How long a probe result is re-used (zero disables caching)
    #[builder(default = "Duration::ZERO", getter)]
    pub cache_duration: Duration,

    /// Status reported when the probe fails
    #[builder(default = "HealthStatus::Unhealthy", getter)]
    pub failure_status: HealthStatus,

    /// Probe timeout; absent or zero defers to the health subsystem
    #[builder(default = "None", getter)]
    pub timeout: Option<Duration>,
}

impl Default for HealthOptions {
    fn default() -> Self {
        Self {
            include_in_readiness_check: false,
            cache_duration: Duration::ZERO,
            failure_status: HealthStatus::Unhealthy,
            timeout: None,
        }
    }
}

impl HealthOptions {
    /// Timeout to forward to the health subsystem, if any
    pub fn effective_timeout(&self) -> Option<Duration> {
        effective_timeout(self.timeout)
    }
}

// Add convenience methods to the generated builder
impl HealthOptionsBuilder {
    pub fn readiness(self) -> Self {
        self.include_in_readiness_check(true)
    }

    pub fn timeout_duration(self, timeout: Duration) -> Self {
        self.timeout(Some(timeout))
    }

    pub fn cache_for(self, duration: Duration) -> Self {
        self.cache_duration(duration)
    }

    pub fn build_options(self) -> HealthOptions {
        // All fields carry defaults
        self.build_with_defaults().unwrap_or_default()
    }
}
