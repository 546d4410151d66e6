//! Configurable provider that records every hook invocation

use crate::probes::StaticProbe;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden_core::{
    HealthProbe, HealthStatus, InstanceProvider, InstanceSettings, Named, ProviderCategory,
    ProviderError, ServiceCollection, ServiceLocator,
};

/// Service registered by [`TestProvider::add_instance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestClient {
    pub key: String,
    pub instance_name: String,
    pub connection_string: String,
}

/// Hook invocations observed by a [`TestProvider`]
#[derive(Debug, Default)]
pub struct ProviderCalls {
    parsed: Mutex<Vec<String>>,
    validated: Mutex<Vec<String>>,
    added: Mutex<Vec<String>>,
    probes_created: AtomicUsize,
}

impl ProviderCalls {
    /// Raw connection values passed to the parse hook
    pub fn parsed_connections(&self) -> Vec<String> {
        self.parsed.lock().clone()
    }

    /// Instance names passed to the validation hook
    pub fn validated(&self) -> Vec<String> {
        self.validated.lock().clone()
    }

    /// Instance keys passed to the registration hook
    pub fn added_keys(&self) -> Vec<String> {
        self.added.lock().clone()
    }

    pub fn probes_created(&self) -> usize {
        self.probes_created.load(Ordering::SeqCst)
    }
}

/// Provider whose hook behaviour is configured per test
#[derive(Debug, Clone)]
pub struct TestProvider {
    category: ProviderCategory,
    name: String,
    sources: Vec<String>,
    rejected_instances: Vec<String>,
    failing_keys: Vec<String>,
    discriminators: HashMap<String, String>,
    probe_status: HealthStatus,
    calls: Arc<ProviderCalls>,
}

impl TestProvider {
    pub fn new(category: ProviderCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            sources: Vec::new(),
            rejected_instances: Vec::new(),
            failing_keys: Vec::new(),
            discriminators: HashMap::new(),
            probe_status: HealthStatus::Healthy,
            calls: Arc::new(ProviderCalls::default()),
        }
    }

    /// `Cache` / `Redis` provider with one instrumentation source
    pub fn redis() -> Self {
        Self::new(ProviderCategory::Cache, "Redis").with_sources(&["Warden.Redis"])
    }

    pub fn with_sources(mut self, sources: &[&str]) -> Self {
        self.sources = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Fail provider validation for the named instance
    pub fn rejecting(mut self, instance_name: impl Into<String>) -> Self {
        self.rejected_instances.push(instance_name.into());
        self
    }

    /// Fail service registration for the instance key
    pub fn failing_registration(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.push(key.into());
        self
    }

    /// Fold `discriminator` into the connection identity of the named instance
    pub fn with_discriminator(
        mut self,
        instance_name: impl Into<String>,
        discriminator: impl Into<String>,
    ) -> Self {
        self.discriminators
            .insert(instance_name.into(), discriminator.into());
        self
    }

    pub fn with_probe_status(mut self, status: HealthStatus) -> Self {
        self.probe_status = status;
        self
    }

    /// Shared handle to the recorded calls; stays valid after the provider is moved
    pub fn calls(&self) -> Arc<ProviderCalls> {
        Arc::clone(&self.calls)
    }
}

impl InstanceProvider for TestProvider {
    type Instance = InstanceSettings;

    fn category(&self) -> ProviderCategory {
        self.category.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn instrumentation_sources(&self) -> Vec<String> {
        self.sources.clone()
    }

    fn validate_settings(&self, instance: &InstanceSettings) -> Result<(), ProviderError> {
        self.calls.validated.lock().push(instance.name.clone());
        if self.rejected_instances.iter().any(|n| n == instance.name()) {
            return Err(ProviderError::validation(format!(
                "instance '{}' is not allowed",
                instance.name
            )));
        }
        Ok(())
    }

    fn parse_connection_string(
        &self,
        instance: &mut InstanceSettings,
        raw: &str,
    ) -> Result<(), ProviderError> {
        self.calls.parsed.lock().push(raw.to_string());
        if raw.trim().is_empty() {
            return Err(ProviderError::connection_parse(
                "connection string must not be blank",
            ));
        }
        instance.connection_string = Some(raw.trim().to_string());
        Ok(())
    }

    fn connection_discriminator(&self, instance: &InstanceSettings) -> String {
        self.discriminators
            .get(&instance.name)
            .cloned()
            .unwrap_or_default()
    }

    fn add_instance(
        &self,
        services: &mut dyn ServiceCollection,
        key: &str,
        instance: &InstanceSettings,
    ) -> Result<(), ProviderError> {
        self.calls.added.lock().push(key.to_string());
        if self.failing_keys.iter().any(|k| k == key) {
            return Err(ProviderError::registration(format!(
                "cannot construct client for '{key}'"
            )));
        }

        services.add_keyed(
            key,
            TestClient {
                key: key.to_string(),
                instance_name: instance.name.clone(),
                connection_string: instance.connection_string.clone().unwrap_or_default(),
            },
        );
        Ok(())
    }

    fn create_health_check(
        &self,
        services: &dyn ServiceLocator,
        key: &str,
        _instance: &InstanceSettings,
    ) -> Box<dyn HealthProbe> {
        self.calls.probes_created.fetch_add(1, Ordering::SeqCst);
        let status = if services.resolve_keyed::<TestClient>(key).is_some() {
            self.probe_status
        } else {
            HealthStatus::Unhealthy
        };
        Box::new(StaticProbe::new(status))
    }
}
