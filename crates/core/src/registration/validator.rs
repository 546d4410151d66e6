use crate::errors::RegistrationError;
use crate::foundation::InstanceConfig;
use crate::providers::ProviderCategory;
use crate::registration::RegistrationLedger;
use std::fmt;

/// Canonical identity of a resolved endpoint: blake3 over the length-prefixed
/// connection string and provider discriminator, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionIdentity(String);

impl ConnectionIdentity {
    pub fn compute(connection_string: &str, discriminator: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in [connection_string, discriminator] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        Self(hex::encode(hasher.finalize().as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejects a second instance pointing at an already-claimed endpoint
#[derive(Debug, Clone)]
pub struct ConnectionValidator {
    ledger: RegistrationLedger,
}

impl ConnectionValidator {
    pub fn new(ledger: RegistrationLedger) -> Self {
        Self { ledger }
    }

    /// Claim the instance's connection identity within `category`.
    ///
    /// `provider` is the `{category}.{name}` label used in errors.
    pub fn validate<I: InstanceConfig>(
        &self,
        instance: &I,
        category: &ProviderCategory,
        provider: &str,
        discriminator: &str,
    ) -> Result<ConnectionIdentity, RegistrationError> {
        let connection_string = instance
            .connection_string()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| RegistrationError::MissingConnection {
                provider: provider.to_string(),
                instance: instance.name().to_string(),
            })?;

        let identity = ConnectionIdentity::compute(connection_string, discriminator);
        self.ledger
            .claim_connection(category, &identity, instance.name())
            .map_err(|conflict| RegistrationError::DuplicateConnection {
                category: category.to_string(),
                provider: provider.to_string(),
                instance: instance.name().to_string(),
                existing_instance: conflict.owner,
            })?;

        tracing::debug!(
            provider,
            instance = instance.name(),
            connection = %identity,
            "Claimed connection identity"
        );
        Ok(identity)
    }
}
