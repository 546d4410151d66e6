//! # warden-core
//!
//! Startup-time registration and validation of provider instances.
//!
//! A provider (a Redis cache, a RabbitMQ queue, ...) declares any number of
//! named instances in its [`ProviderSettings`]. [`InstanceRegistrar`] walks
//! them in declaration order and, for each one, claims its registration key,
//! resolves and claims its connection endpoint, runs the provider's hooks and
//! binds a health probe when asked to. Uniqueness is tracked in a
//! caller-owned [`RegistrationContext`], so two instances can never share a
//! key or point at the same endpoint within one provider category.

pub mod connections;
pub mod errors;
pub mod foundation;
pub mod health;
pub mod instrumentation;
pub mod logging;
pub mod providers;
pub mod registration;
pub mod services;
pub mod settings;

// Re-export key types for convenience
pub use connections::{ChainedConnectionLookup, ConnectionLookup, ConnectionStrings, EnvConnectionStrings};
pub use errors::{ConfigError, ProviderError, RegistrationError, RegistrationErrorKind};
pub use foundation::{Connectable, HasInstanceSettings, HealthConfigured, InstanceConfig, Named};
pub use health::{
    CachedHealthProbe, HealthCheckBinder, HealthCheckFactory, HealthCheckRegistration,
    HealthCheckRegistry, HealthProbe, HealthReport, HealthStatus, READINESS_TAG,
};
pub use instrumentation::{TracingBinder, TracingRegistry};
pub use providers::{InstanceProvider, ProviderCategory, ProviderMetadata, ProviderRegistry};
pub use registration::{
    Capabilities, ConnectionIdentity, ConnectionValidator, InstanceOutcome, InstanceRegistrar,
    RegistrationContext, RegistrationLedger, RegistrationSummary,
};
pub use services::{KeyedServiceRegistry, ServiceCollection, ServiceLocator};
pub use settings::{HealthOptions, HealthOptionsBuilder, InstanceEntry, InstanceSettings, ProviderSettings};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
