//! # warden-testing
//!
//! Recording fakes for every capability `warden-core` writes to, plus a
//! configurable provider, so registration behaviour can be asserted without
//! a real container, health subsystem or tracing backend.
//!
//! ```rust
//! use warden_testing::prelude::*;
//!
//! let mut host = TestHost::new().with_connection("main", "redis://host:6379");
//! let registrar = InstanceRegistrar::new(TestProvider::redis(), RegistrationContext::new());
//! let settings = ProviderSettings::new().with_instance("primary", InstanceSettings::new("main"));
//!
//! let summary = registrar.register_all(&settings, &mut host.capabilities()).unwrap();
//! assert_eq!(summary.instance_keys(), vec!["primary"]);
//! ```

pub mod assertions;
pub mod probes;
pub mod provider;
pub mod registries;

// Re-export commonly used types
pub use assertions::TestAssertions;
pub use probes::StaticProbe;
pub use provider::{ProviderCalls, TestClient, TestProvider};
pub use registries::{RecordingHealthRegistry, RecordingTracingRegistry, TestHost};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        assertions::TestAssertions,
        probes::StaticProbe,
        provider::{ProviderCalls, TestClient, TestProvider},
        registries::{RecordingHealthRegistry, RecordingTracingRegistry, TestHost},
        utils,
    };

    pub use warden_core::{
        HealthOptions, HealthStatus, InstanceRegistrar, InstanceSettings, ProviderCategory,
        ProviderRegistry, ProviderSettings, RegistrationContext, RegistrationError,
        RegistrationErrorKind,
    };
}

// Error handling
#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("Assertion failed: {message}")]
    Assertion { message: String },
}

pub type TestResult<T> = Result<T, TestError>;

/// Test utilities and helper functions
pub mod utils {
    use warden_core::logging::{init_logging, LoggingConfig};

    /// Install the quiet test subscriber; later calls are no-ops
    pub fn init_test_logging() {
        let _ = init_logging(LoggingConfig::test());
    }

    /// Registration key as the registrar composes it
    pub fn registration_key(category: &str, provider: &str, key: &str) -> String {
        format!("{}.{}:{}", category, provider, key)
    }
}
