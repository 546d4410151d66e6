use crate::connections::ConnectionLookup;
use crate::errors::RegistrationError;
use crate::foundation::{Connectable, HealthConfigured, Named};
use crate::health::{health_tags, CachedHealthProbe, HealthCheckFactory, HealthCheckRegistry, HealthProbe};
use crate::instrumentation::TracingRegistry;
use crate::providers::{InstanceProvider, ProviderMetadata};
use crate::registration::{
    Capabilities, ConnectionIdentity, ConnectionValidator, RegistrationContext,
};
use crate::services::ServiceLocator;
use crate::settings::ProviderSettings;
use std::sync::Arc;
use std::time::Duration;

/// Result of registering one instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceOutcome {
    pub key: String,
    pub registration_key: String,
    pub instance_name: String,
    pub connection: ConnectionIdentity,
    pub health_check_bound: bool,
}

/// What a successful `register_all` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// `{category}.{name}` of the provider
    pub provider: String,
    pub instances: Vec<InstanceOutcome>,
    /// Sources handed to the tracing registry, empty if none were
    pub tracing_sources: Vec<String>,
}

impl RegistrationSummary {
    fn new(provider: String) -> Self {
        Self {
            provider,
            instances: Vec::new(),
            tracing_sources: Vec::new(),
        }
    }

    pub fn instance_keys(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.key.as_str()).collect()
    }

    pub fn health_checks_bound(&self) -> usize {
        self.instances.iter().filter(|i| i.health_check_bound).count()
    }
}

/// Runs the per-instance registration pipeline for one provider
pub struct InstanceRegistrar<P: InstanceProvider> {
    provider: Arc<P>,
    metadata: ProviderMetadata,
    context: RegistrationContext,
    validator: ConnectionValidator,
}

impl<P: InstanceProvider> InstanceRegistrar<P> {
    pub fn new(provider: P, context: RegistrationContext) -> Self {
        let metadata = ProviderMetadata::from_provider(&provider);
        let validator = ConnectionValidator::new(context.ledger().clone());
        Self {
            provider: Arc::new(provider),
            metadata,
            context,
            validator,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    pub fn context(&self) -> &RegistrationContext {
        &self.context
    }

    /// `{category}.{name}:{key}`
    pub fn registration_key(&self, key: &str) -> String {
        format!("{}:{}", self.metadata.label(), key)
    }

    /// Register every declared instance in order, stopping at the first failure.
    ///
    /// Instances registered before a failure stay registered. Tracing sources
    /// are bound once all instances succeed and only on the first run for this
    /// provider within the context.
    pub fn register_all(
        &self,
        settings: &ProviderSettings<P::Instance>,
        capabilities: &mut Capabilities<'_>,
    ) -> Result<RegistrationSummary, RegistrationError> {
        let provider = self.metadata.label();
        tracing::info!(
            run = %self.context.id(),
            provider = %provider,
            instances = settings.instances.len(),
            "Registering provider instances"
        );

        let mut summary = RegistrationSummary::new(provider.clone());
        for entry in &settings.instances {
            let outcome = self
                .register_instance(&entry.key, entry.settings.as_ref(), capabilities)
                .map_err(|error| {
                    tracing::error!(
                        run = %self.context.id(),
                        provider = %provider,
                        key = %entry.key,
                        error = %error,
                        "Instance registration failed"
                    );
                    error
                })?;
            summary.instances.push(outcome);
        }

        if settings.enable_tracing {
            summary.tracing_sources = self.bind_tracing(capabilities.tracing);
        }

        Ok(summary)
    }

    /// Run the pipeline for one instance.
    ///
    /// Order: key claim, presence, connection resolution, connection claim,
    /// provider validation, service registration, health binding.
    pub fn register_instance(
        &self,
        key: &str,
        instance: Option<&P::Instance>,
        capabilities: &mut Capabilities<'_>,
    ) -> Result<InstanceOutcome, RegistrationError> {
        let provider = self.metadata.label();
        let registration_key = self.registration_key(key);

        let owner = instance
            .map(|i| i.name().trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(key);
        self.context
            .ledger()
            .claim_key(&self.metadata.category, &registration_key, owner)
            .map_err(|conflict| RegistrationError::DuplicateRegistrationKey {
                registration_key: registration_key.clone(),
                existing_instance: conflict.owner,
            })?;
        tracing::debug!(registration_key = %registration_key, "Claimed registration key");

        let instance = instance.ok_or_else(|| RegistrationError::MissingSettings {
            provider: provider.clone(),
            key: key.to_string(),
        })?;
        if instance.name().trim().is_empty() {
            return Err(RegistrationError::MissingName {
                provider,
                key: key.to_string(),
            });
        }

        let mut resolved = instance.clone();
        self.resolve_connection(&mut resolved, capabilities.connections)?;

        let discriminator = self.provider.connection_discriminator(&resolved);
        let connection = self.validator.validate(
            &resolved,
            &self.metadata.category,
            &provider,
            &discriminator,
        )?;

        self.provider.validate_settings(&resolved).map_err(|source| {
            RegistrationError::ProviderValidationFailure {
                provider: provider.clone(),
                instance: resolved.name().to_string(),
                source,
            }
        })?;

        self.provider
            .add_instance(capabilities.services, key, &resolved)
            .map_err(|source| RegistrationError::ServiceRegistrationFailed {
                provider: provider.clone(),
                key: key.to_string(),
                source,
            })?;

        let health_check_bound =
            self.bind_health_check(key, &registration_key, &resolved, capabilities.health_checks);

        tracing::info!(
            registration_key = %registration_key,
            instance = resolved.name(),
            health_check = health_check_bound,
            "Registered provider instance"
        );

        Ok(InstanceOutcome {
            key: key.to_string(),
            registration_key,
            instance_name: resolved.name().to_string(),
            connection,
            health_check_bound,
        })
    }

    /// Named connection first, then the inline value; the parse hook stores it
    fn resolve_connection(
        &self,
        instance: &mut P::Instance,
        connections: &dyn ConnectionLookup,
    ) -> Result<(), RegistrationError> {
        let provider = self.metadata.label();
        let raw = match connections.lookup(instance.name()) {
            Some(named) => {
                tracing::debug!(instance = instance.name(), "Using named connection string");
                named
            }
            None => instance
                .connection_string()
                .filter(|inline| !inline.trim().is_empty())
                .map(str::to_owned)
                .ok_or_else(|| RegistrationError::MissingConnectionString {
                    provider: provider.clone(),
                    instance: instance.name().to_string(),
                })?,
        };

        self.provider
            .parse_connection_string(instance, &raw)
            .map_err(|source| RegistrationError::ConnectionParseFailure {
                provider,
                instance: instance.name().to_string(),
                source,
            })
    }

    fn bind_health_check(
        &self,
        key: &str,
        registration_key: &str,
        instance: &P::Instance,
        registry: &mut dyn HealthCheckRegistry,
    ) -> bool {
        if !instance.health_checks_enabled() {
            return false;
        }
        let Some(options) = instance.health_options() else {
            tracing::debug!(
                registration_key,
                "Health checks enabled without health options, skipping"
            );
            return false;
        };

        let tags = health_tags(
            &self.metadata.category,
            &self.metadata.name,
            *options.get_include_in_readiness_check(),
        );
        let factory = self.health_check_factory(key, instance, *options.get_cache_duration());
        self.context.health().bind_health_check(
            registry,
            registration_key,
            factory,
            *options.get_failure_status(),
            tags,
            *options.get_timeout(),
        )
    }

    fn health_check_factory(
        &self,
        key: &str,
        instance: &P::Instance,
        cache_duration: Duration,
    ) -> HealthCheckFactory {
        let provider = Arc::clone(&self.provider);
        let key = key.to_string();
        let instance = instance.clone();
        Arc::new(move |services: &dyn ServiceLocator| -> Box<dyn HealthProbe> {
            let probe = provider.create_health_check(services, &key, &instance);
            if cache_duration.is_zero() {
                probe
            } else {
                Box::new(CachedHealthProbe::new(probe, cache_duration))
            }
        })
    }

    fn bind_tracing(&self, registry: &mut dyn TracingRegistry) -> Vec<String> {
        self.context.tracing().bind_sources(
            registry,
            &self.metadata.label(),
            &self.metadata.instrumentation_sources,
        )
    }
}

impl<P: InstanceProvider + std::fmt::Debug> std::fmt::Debug for InstanceRegistrar<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceRegistrar")
            .field("provider", &self.provider)
            .field("metadata", &self.metadata)
            .field("context", &self.context.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::ConnectionStrings;
    use crate::errors::ProviderError;
    use crate::health::{HealthCheckRegistration, HealthReport};
    use crate::providers::ProviderCategory;
    use crate::services::{KeyedServiceRegistry, ServiceCollection};
    use crate::settings::InstanceSettings;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct MemcachedProvider;

    struct Up;

    #[async_trait]
    impl HealthProbe for Up {
        async fn check(&self) -> HealthReport {
            HealthReport::healthy()
        }
    }

    impl InstanceProvider for MemcachedProvider {
        type Instance = InstanceSettings;

        fn category(&self) -> ProviderCategory {
            ProviderCategory::Cache
        }

        fn name(&self) -> &str {
            "Memcached"
        }

        fn add_instance(
            &self,
            services: &mut dyn ServiceCollection,
            key: &str,
            instance: &InstanceSettings,
        ) -> Result<(), ProviderError> {
            services.add_keyed(key, instance.clone());
            Ok(())
        }

        fn create_health_check(
            &self,
            _services: &dyn ServiceLocator,
            _key: &str,
            _instance: &InstanceSettings,
        ) -> Box<dyn HealthProbe> {
            Box::new(Up)
        }
    }

    #[derive(Default)]
    struct Sink(Vec<HealthCheckRegistration>);

    impl HealthCheckRegistry for Sink {
        fn add(&mut self, registration: HealthCheckRegistration) {
            self.0.push(registration);
        }
    }

    #[derive(Default)]
    struct Sources(Vec<Vec<String>>);

    impl TracingRegistry for Sources {
        fn add_sources(&mut self, names: &[String]) {
            self.0.push(names.to_vec());
        }
    }

    #[test]
    fn test_registration_key_uses_provider_label() {
        let registrar = InstanceRegistrar::new(MemcachedProvider, RegistrationContext::new());
        assert_eq!(registrar.registration_key("sessions"), "Cache.Memcached:sessions");
    }

    #[test]
    fn test_default_hooks_store_inline_connection() {
        let registrar = InstanceRegistrar::new(MemcachedProvider, RegistrationContext::new());
        let mut services = KeyedServiceRegistry::new();
        let connections = ConnectionStrings::new();
        let mut sink = Sink::default();
        let mut sources = Sources::default();
        let mut capabilities =
            Capabilities::new(&mut services, &connections, &mut sink, &mut sources);

        let instance =
            InstanceSettings::new("sessions").with_connection_string("memcached://cache:11211");
        let outcome = registrar
            .register_instance("sessions", Some(&instance), &mut capabilities)
            .expect("registers");

        assert_eq!(outcome.registration_key, "Cache.Memcached:sessions");
        assert!(!outcome.health_check_bound);
        let stored = services
            .resolve::<InstanceSettings>("sessions")
            .expect("instance registered");
        assert_eq!(stored.connection_string.as_deref(), Some("memcached://cache:11211"));
        assert!(sink.0.is_empty());
        assert!(sources.0.is_empty());
    }

    #[test]
    fn test_failed_instance_keeps_key_claimed() {
        let context = RegistrationContext::new();
        let registrar = InstanceRegistrar::new(MemcachedProvider, context.clone());
        let mut services = KeyedServiceRegistry::new();
        let connections = ConnectionStrings::new();
        let mut sink = Sink::default();
        let mut sources = Sources::default();
        let mut capabilities =
            Capabilities::new(&mut services, &connections, &mut sink, &mut sources);

        let error = registrar
            .register_instance("sessions", None, &mut capabilities)
            .expect_err("missing settings");

        assert!(error.is_missing());
        assert_eq!(
            context.ledger().key_owner(&ProviderCategory::Cache, "Cache.Memcached:sessions"),
            Some("sessions".to_string())
        );
    }
}
