//! Record of claimed registration keys and connection identities.
//!
//! Both keyspaces are scoped per provider category label and only ever grow.
//! Claims use the `dashmap` entry API, so insert-if-absent stays atomic when
//! several bootstrap threads share one ledger.

use crate::providers::ProviderCategory;
use crate::registration::ConnectionIdentity;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// A claim that lost against an earlier one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConflict {
    /// Instance that holds the claim
    pub owner: String,
}

/// `(category label, value)`
type LedgerKey = (String, String);

#[derive(Debug, Clone, Default)]
pub struct RegistrationLedger {
    keys: Arc<DashMap<LedgerKey, String>>,
    connections: Arc<DashMap<LedgerKey, String>>,
}

impl RegistrationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a registration key for `owner`
    pub fn claim_key(
        &self,
        category: &ProviderCategory,
        registration_key: &str,
        owner: &str,
    ) -> Result<(), LedgerConflict> {
        claim(&self.keys, category, registration_key, owner)
    }

    /// Claim a connection identity for `owner`
    pub fn claim_connection(
        &self,
        category: &ProviderCategory,
        identity: &ConnectionIdentity,
        owner: &str,
    ) -> Result<(), LedgerConflict> {
        claim(&self.connections, category, identity.as_str(), owner)
    }

    pub fn is_key_claimed(&self, category: &ProviderCategory, registration_key: &str) -> bool {
        self.keys
            .contains_key(&(category.to_string(), registration_key.to_string()))
    }

    pub fn key_owner(&self, category: &ProviderCategory, registration_key: &str) -> Option<String> {
        self.keys
            .get(&(category.to_string(), registration_key.to_string()))
            .map(|owner| owner.value().clone())
    }

    pub fn connection_owner(
        &self,
        category: &ProviderCategory,
        identity: &ConnectionIdentity,
    ) -> Option<String> {
        self.connections
            .get(&(category.to_string(), identity.as_str().to_string()))
            .map(|owner| owner.value().clone())
    }

    /// Claimed registration keys of a category, sorted
    pub fn claimed_keys(&self, category: &ProviderCategory) -> Vec<String> {
        let label = category.to_string();
        let mut keys: Vec<String> = self
            .keys
            .iter()
            .filter(|entry| entry.key().0 == label)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

fn claim(
    map: &DashMap<LedgerKey, String>,
    category: &ProviderCategory,
    value: &str,
    owner: &str,
) -> Result<(), LedgerConflict> {
    match map.entry((category.to_string(), value.to_string())) {
        Entry::Occupied(existing) => Err(LedgerConflict {
            owner: existing.get().clone(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(owner.to_string());
            Ok(())
        }
    }
}
