use dashmap::DashSet;
use std::sync::Arc;

/// External distributed-tracing capability
pub trait TracingRegistry {
    fn add_sources(&mut self, names: &[String]);
}

/// Registers a provider's instrumentation sources once per provider label
#[derive(Debug, Clone, Default)]
pub struct TracingBinder {
    bound: Arc<DashSet<String>>,
}

impl TracingBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sources handed to the registry; empty when skipped
    pub fn bind_sources(
        &self,
        registry: &mut dyn TracingRegistry,
        provider: &str,
        sources: &[String],
    ) -> Vec<String> {
        if sources.is_empty() {
            tracing::debug!(provider, "Provider declares no instrumentation sources");
            return Vec::new();
        }
        if !self.bound.insert(provider.to_string()) {
            tracing::warn!(provider, "Tracing sources already registered, skipping");
            return Vec::new();
        }

        tracing::info!(provider, sources = ?sources, "Registering tracing sources");
        registry.add_sources(sources);
        sources.to_vec()
    }

    pub fn is_bound(&self, provider: &str) -> bool {
        self.bound.contains(provider)
    }
}
