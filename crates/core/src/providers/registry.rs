use crate::errors::RegistrationError;
use crate::providers::{InstanceProvider, ProviderMetadata};
use crate::registration::{Capabilities, InstanceRegistrar, RegistrationContext, RegistrationSummary};
use crate::settings::ProviderSettings;
use std::collections::HashMap;

/// A provider bound to its settings, ready to run
trait RegistrationJob: Send + Sync {
    fn metadata(&self) -> &ProviderMetadata;

    fn run(&self, capabilities: &mut Capabilities<'_>) -> Result<RegistrationSummary, RegistrationError>;
}

struct ProviderJob<P: InstanceProvider> {
    registrar: InstanceRegistrar<P>,
    settings: ProviderSettings<P::Instance>,
}

impl<P: InstanceProvider> RegistrationJob for ProviderJob<P> {
    fn metadata(&self) -> &ProviderMetadata {
        self.registrar.metadata()
    }

    fn run(&self, capabilities: &mut Capabilities<'_>) -> Result<RegistrationSummary, RegistrationError> {
        self.registrar.register_all(&self.settings, capabilities)
    }
}

/// Provider registry runs several providers against one registration context
pub struct ProviderRegistry {
    context: RegistrationContext,
    jobs: Vec<Box<dyn RegistrationJob>>,
    metadata_cache: HashMap<String, ProviderMetadata>,
}

impl ProviderRegistry {
    pub fn new(context: RegistrationContext) -> Self {
        Self {
            context,
            jobs: Vec::new(),
            metadata_cache: HashMap::new(),
        }
    }

    /// Add a provider with its settings; each `{category}.{name}` may be added once
    pub fn register<P: InstanceProvider>(
        &mut self,
        provider: P,
        settings: ProviderSettings<P::Instance>,
    ) -> Result<(), RegistrationError> {
        let registrar = InstanceRegistrar::new(provider, self.context.clone());
        let metadata = registrar.metadata().clone();
        let label = metadata.label();
        if self.metadata_cache.contains_key(&label) {
            return Err(RegistrationError::DuplicateProvider { provider: label });
        }

        self.metadata_cache.insert(label, metadata);
        self.jobs.push(Box::new(ProviderJob { registrar, settings }));
        Ok(())
    }

    /// Get the number of registered providers
    pub fn provider_count(&self) -> usize {
        self.jobs.len()
    }

    /// Get provider metadata by `{category}.{name}` label
    pub fn get_metadata(&self, label: &str) -> Option<&ProviderMetadata> {
        self.metadata_cache.get(label)
    }

    pub fn context(&self) -> &RegistrationContext {
        &self.context
    }

    /// Run every provider in insertion order, stopping at the first failure
    pub fn register_all(
        &self,
        capabilities: &mut Capabilities<'_>,
    ) -> Result<Vec<RegistrationSummary>, RegistrationError> {
        let mut summaries = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            tracing::info!("Registering provider: {}", job.metadata().label());
            summaries.push(job.run(capabilities)?);
        }
        Ok(summaries)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(RegistrationContext::new())
    }
}
