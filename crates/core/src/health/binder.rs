use crate::health::{HealthCheckFactory, HealthCheckRegistration, HealthCheckRegistry, HealthStatus};
use crate::providers::ProviderCategory;
use dashmap::DashSet;
use std::sync::Arc;
use std::time::Duration;

/// Reserved tag marking a probe as part of the readiness set
pub const READINESS_TAG: &str = "ready";

/// Tags for an instance probe: `[category, provider]`, lower-cased, with the
/// readiness tag in front when requested.
pub fn health_tags(
    category: &ProviderCategory,
    provider_name: &str,
    include_in_readiness_check: bool,
) -> Vec<String> {
    let mut tags = Vec::with_capacity(3);
    if include_in_readiness_check {
        tags.push(READINESS_TAG.to_string());
    }
    tags.push(category.slug());
    tags.push(provider_name.to_lowercase());
    tags
}

/// Only strictly positive timeouts are forwarded
pub fn effective_timeout(timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|t| !t.is_zero())
}

/// Forwards health-check registrations, at most once per fully-qualified name
#[derive(Debug, Clone, Default)]
pub struct HealthCheckBinder {
    bound: Arc<DashSet<String>>,
}

impl HealthCheckBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name` unless that name was already bound.
    ///
    /// Returns `true` when the registry was called.
    pub fn bind_health_check(
        &self,
        registry: &mut dyn HealthCheckRegistry,
        name: &str,
        factory: HealthCheckFactory,
        failure_status: HealthStatus,
        tags: Vec<String>,
        timeout: Option<Duration>,
    ) -> bool {
        if !self.bound.insert(name.to_string()) {
            tracing::warn!(health_check = name, "Health check already registered, skipping");
            return false;
        }

        let timeout = effective_timeout(timeout);
        tracing::info!(
            health_check = name,
            tags = ?tags,
            timeout = ?timeout,
            "Registering health check"
        );
        registry.add(HealthCheckRegistration {
            name: name.to_string(),
            factory,
            failure_status,
            tags,
            timeout,
        });
        true
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }
}
