use crate::errors::{ConfigError, ProviderError};
use crate::foundation::{Connectable, InstanceConfig};
use crate::health::HealthProbe;
use crate::services::{ServiceCollection, ServiceLocator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad kind of pluggable service.
///
/// Serialized as its display name. Custom names that match a built-in
/// category resolve to the built-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderCategory {
    Cache,
    Database,
    Queue,
    Storage,
    Search,
    Messaging,
    Email,
    Custom(String),
}

impl ProviderCategory {
    /// Category for `name`, resolving built-in names case-insensitively
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::builtin(&name).unwrap_or(Self::Custom(name))
    }

    fn builtin(name: &str) -> Option<Self> {
        let category = match name.trim().to_lowercase().as_str() {
            "cache" => Self::Cache,
            "database" => Self::Database,
            "queue" => Self::Queue,
            "storage" => Self::Storage,
            "search" => Self::Search,
            "messaging" => Self::Messaging,
            "email" => Self::Email,
            _ => return None,
        };
        Some(category)
    }

    /// Lower-case form used for health tags
    pub fn slug(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cache => "Cache",
            Self::Database => "Database",
            Self::Queue => "Queue",
            Self::Storage => "Storage",
            Self::Search => "Search",
            Self::Messaging => "Messaging",
            Self::Email => "Email",
            Self::Custom(name) => name.as_str(),
        };
        f.write_str(name)
    }
}

impl FromStr for ProviderCategory {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "provider_category",
                value,
                "a non-empty category name",
            ));
        }
        Ok(Self::custom(value.trim()))
    }
}

impl TryFrom<String> for ProviderCategory {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProviderCategory> for String {
    fn from(category: ProviderCategory) -> Self {
        category.to_string()
    }
}

/// A concrete provider: its identity plus the hooks the registrar calls.
///
/// The registrar is generic over this trait, so hooks are dispatched
/// statically. Only `add_instance` and `create_health_check` are required.
pub trait InstanceProvider: Send + Sync + 'static {
    /// Instance settings type this provider binds
    type Instance: InstanceConfig;

    fn category(&self) -> ProviderCategory;

    fn name(&self) -> &str;

    /// Tracing source names registered when tracing is enabled
    fn instrumentation_sources(&self) -> Vec<String> {
        Vec::new()
    }

    /// Extra provider-specific validation, run after the connection is claimed
    fn validate_settings(&self, instance: &Self::Instance) -> Result<(), ProviderError> {
        let _ = instance;
        Ok(())
    }

    /// Store (or decompose) the raw connection value on the instance
    fn parse_connection_string(
        &self,
        instance: &mut Self::Instance,
        raw: &str,
    ) -> Result<(), ProviderError> {
        if raw.trim().is_empty() {
            return Err(ProviderError::connection_parse(
                "connection string must not be blank",
            ));
        }
        instance.set_connection_string(raw.to_string());
        Ok(())
    }

    /// Extra value folded into the connection identity
    fn connection_discriminator(&self, instance: &Self::Instance) -> String {
        let _ = instance;
        String::new()
    }

    /// Construct and register the instance's services
    fn add_instance(
        &self,
        services: &mut dyn ServiceCollection,
        key: &str,
        instance: &Self::Instance,
    ) -> Result<(), ProviderError>;

    /// Construct the health probe for an instance
    fn create_health_check(
        &self,
        services: &dyn ServiceLocator,
        key: &str,
        instance: &Self::Instance,
    ) -> Box<dyn HealthProbe>;
}

/// Provider metadata for introspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub category: ProviderCategory,
    pub name: String,
    pub instrumentation_sources: Vec<String>,
}

impl ProviderMetadata {
    /// Create metadata from a provider
    pub fn from_provider<P: InstanceProvider + ?Sized>(provider: &P) -> Self {
        Self {
            category: provider.category(),
            name: provider.name().to_string(),
            instrumentation_sources: provider.instrumentation_sources(),
        }
    }

    /// `{category}.{name}`, the prefix of every registration key
    pub fn label(&self) -> String {
        format!("{}.{}", self.category, self.name)
    }
}
