//! Recording implementations of the external capabilities

use warden_core::{
    Capabilities, ConnectionStrings, HealthCheckRegistration, HealthCheckRegistry,
    KeyedServiceRegistry, TracingRegistry,
};

/// Health-check registry that keeps every registration it receives
#[derive(Debug, Default)]
pub struct RecordingHealthRegistry {
    registrations: Vec<HealthCheckRegistration>,
}

impl RecordingHealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> &[HealthCheckRegistration] {
        &self.registrations
    }

    pub fn names(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&HealthCheckRegistration> {
        self.registrations.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl HealthCheckRegistry for RecordingHealthRegistry {
    fn add(&mut self, registration: HealthCheckRegistration) {
        tracing::debug!(health_check = %registration.name, "Recorded health check");
        self.registrations.push(registration);
    }
}

/// Tracing registry that keeps every `add_sources` call
#[derive(Debug, Default)]
pub struct RecordingTracingRegistry {
    calls: Vec<Vec<String>>,
}

impl RecordingTracingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Vec<String>] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// All sources across calls, in call order
    pub fn sources(&self) -> Vec<&str> {
        self.calls
            .iter()
            .flat_map(|call| call.iter().map(String::as_str))
            .collect()
    }
}

impl TracingRegistry for RecordingTracingRegistry {
    fn add_sources(&mut self, names: &[String]) {
        self.calls.push(names.to_vec());
    }
}

/// Bundle of fakes standing in for the host application
#[derive(Debug, Default)]
pub struct TestHost {
    pub services: KeyedServiceRegistry,
    pub connections: ConnectionStrings,
    pub health: RecordingHealthRegistry,
    pub tracing: RecordingTracingRegistry,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named connection string
    pub fn with_connection(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.connections.insert(name, value);
        self
    }

    /// Borrow the fakes as registration capabilities
    pub fn capabilities(&mut self) -> Capabilities<'_> {
        Capabilities::new(
            &mut self.services,
            &self.connections,
            &mut self.health,
            &mut self.tracing,
        )
    }
}
