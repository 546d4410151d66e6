use crate::connections::ConnectionLookup;
use crate::health::{HealthCheckBinder, HealthCheckRegistry};
use crate::instrumentation::{TracingBinder, TracingRegistry};
use crate::registration::RegistrationLedger;
use crate::services::ServiceCollection;
use uuid::Uuid;

/// State shared by every registrar of one bootstrap run.
///
/// Owned by the caller instead of living in globals; clones share the same
/// ledger and binding sets.
#[derive(Debug, Clone)]
pub struct RegistrationContext {
    id: Uuid,
    ledger: RegistrationLedger,
    health: HealthCheckBinder,
    tracing: TracingBinder,
}

impl RegistrationContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            ledger: RegistrationLedger::new(),
            health: HealthCheckBinder::new(),
            tracing: TracingBinder::new(),
        }
    }

    /// Identifier of this bootstrap run, attached to log events
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ledger(&self) -> &RegistrationLedger {
        &self.ledger
    }

    pub fn health(&self) -> &HealthCheckBinder {
        &self.health
    }

    pub fn tracing(&self) -> &TracingBinder {
        &self.tracing
    }
}

impl Default for RegistrationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// External capabilities a registration run writes to
pub struct Capabilities<'a> {
    pub services: &'a mut dyn ServiceCollection,
    pub connections: &'a dyn ConnectionLookup,
    pub health_checks: &'a mut dyn HealthCheckRegistry,
    pub tracing: &'a mut dyn TracingRegistry,
}

impl<'a> Capabilities<'a> {
    pub fn new(
        services: &'a mut dyn ServiceCollection,
        connections: &'a dyn ConnectionLookup,
        health_checks: &'a mut dyn HealthCheckRegistry,
        tracing: &'a mut dyn TracingRegistry,
    ) -> Self {
        Self {
            services,
            connections,
            health_checks,
            tracing,
        }
    }
}
