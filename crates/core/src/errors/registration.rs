use crate::errors::ProviderError;
use thiserror::Error;

/// Fieldless mirror of [`RegistrationError`] for matching without destructuring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationErrorKind {
    MissingSettings,
    MissingName,
    DuplicateRegistrationKey,
    MissingConnectionString,
    MissingConnection,
    DuplicateConnection,
    ProviderValidationFailure,
    ConnectionParseFailure,
    ServiceRegistrationFailed,
    DuplicateProvider,
}

/// Startup registration failure.
///
/// Every variant is fatal: the caller of `register_all` is expected to abort
/// process start. `provider` fields hold the `{category}.{name}` label.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("No settings were provided for instance '{key}' of provider '{provider}'")]
    MissingSettings { provider: String, key: String },

    #[error("Instance '{key}' of provider '{provider}' has a blank name")]
    MissingName { provider: String, key: String },

    #[error("Registration key '{registration_key}' is already claimed by instance '{existing_instance}'")]
    DuplicateRegistrationKey {
        registration_key: String,
        existing_instance: String,
    },

    #[error(
        "No connection string for instance '{instance}' of provider '{provider}': \
         set one inline or under the connection name '{instance}'"
    )]
    MissingConnectionString { provider: String, instance: String },

    #[error("Instance '{instance}' of provider '{provider}' resolved to an empty connection string")]
    MissingConnection { provider: String, instance: String },

    #[error(
        "Instance '{instance}' of provider '{provider}' points at the same {category} endpoint \
         as instance '{existing_instance}'"
    )]
    DuplicateConnection {
        category: String,
        provider: String,
        instance: String,
        existing_instance: String,
    },

    #[error("Provider '{provider}' rejected the settings of instance '{instance}': {source}")]
    ProviderValidationFailure {
        provider: String,
        instance: String,
        #[source]
        source: ProviderError,
    },

    #[error("Provider '{provider}' could not parse the connection string of instance '{instance}': {source}")]
    ConnectionParseFailure {
        provider: String,
        instance: String,
        #[source]
        source: ProviderError,
    },

    #[error("Provider '{provider}' failed to register instance '{key}': {source}")]
    ServiceRegistrationFailed {
        provider: String,
        key: String,
        #[source]
        source: ProviderError,
    },

    #[error("Provider '{provider}' was added to the bootstrap more than once")]
    DuplicateProvider { provider: String },
}

impl RegistrationError {
    /// Get the error kind
    pub fn kind(&self) -> RegistrationErrorKind {
        match self {
            Self::MissingSettings { .. } => RegistrationErrorKind::MissingSettings,
            Self::MissingName { .. } => RegistrationErrorKind::MissingName,
            Self::DuplicateRegistrationKey { .. } => RegistrationErrorKind::DuplicateRegistrationKey,
            Self::MissingConnectionString { .. } => RegistrationErrorKind::MissingConnectionString,
            Self::MissingConnection { .. } => RegistrationErrorKind::MissingConnection,
            Self::DuplicateConnection { .. } => RegistrationErrorKind::DuplicateConnection,
            Self::ProviderValidationFailure { .. } => {
                RegistrationErrorKind::ProviderValidationFailure
            }
            Self::ConnectionParseFailure { .. } => RegistrationErrorKind::ConnectionParseFailure,
            Self::ServiceRegistrationFailed { .. } => {
                RegistrationErrorKind::ServiceRegistrationFailed
            }
            Self::DuplicateProvider { .. } => RegistrationErrorKind::DuplicateProvider,
        }
    }

    /// Check if the error is a uniqueness violation
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRegistrationKey { .. }
                | Self::DuplicateConnection { .. }
                | Self::DuplicateProvider { .. }
        )
    }

    /// Check if the error is caused by absent configuration
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::MissingSettings { .. }
                | Self::MissingName { .. }
                | Self::MissingConnectionString { .. }
                | Self::MissingConnection { .. }
        )
    }

    /// Check if the error was raised by a provider hook
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::ProviderValidationFailure { .. }
                | Self::ConnectionParseFailure { .. }
                | Self::ServiceRegistrationFailed { .. }
        )
    }
}
