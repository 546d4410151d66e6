use crate::health::{HealthProbe, HealthStatus};
use crate::services::ServiceLocator;
use std::sync::Arc;
use std::time::Duration;

/// Builds a probe once the service container is available
pub type HealthCheckFactory = Arc<dyn Fn(&dyn ServiceLocator) -> Box<dyn HealthProbe> + Send + Sync>;

/// Everything the external health-check subsystem needs to schedule a probe
#[derive(Clone)]
pub struct HealthCheckRegistration {
    pub name: String,
    pub factory: HealthCheckFactory,
    pub failure_status: HealthStatus,
    pub tags: Vec<String>,
    /// `None` means the subsystem default applies
    pub timeout: Option<Duration>,
}

impl HealthCheckRegistration {
    /// Construct the probe this registration describes
    pub fn create_probe(&self, services: &dyn ServiceLocator) -> Box<dyn HealthProbe> {
        (self.factory)(services)
    }
}

impl std::fmt::Debug for HealthCheckRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheckRegistration")
            .field("name", &self.name)
            .field("factory", &"<factory>")
            .field("failure_status", &self.failure_status)
            .field("tags", &self.tags)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// External health-check registry capability
pub trait HealthCheckRegistry {
    fn add(&mut self, registration: HealthCheckRegistration);
}
