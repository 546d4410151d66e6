use thiserror::Error;

/// Error returned by provider hooks.
///
/// The registrar wraps these into the matching [`RegistrationError`](crate::errors::RegistrationError)
/// variant, so providers only describe what went wrong, not where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid connection string: {message}")]
    ConnectionParse { message: String },

    #[error("Service registration failed: {message}")]
    Registration { message: String },
}

impl ProviderError {
    /// Create a settings validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a connection string parse error
    pub fn connection_parse(message: impl Into<String>) -> Self {
        Self::ConnectionParse {
            message: message.into(),
        }
    }

    /// Create a service registration error
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// The human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::ConnectionParse { message }
            | Self::Registration { message } => message,
        }
    }
}
