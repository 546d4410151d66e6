//! Named connection-string resolvers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default environment prefix, e.g. `CONNECTIONSTRINGS__MAIN`
pub const DEFAULT_ENV_PREFIX: &str = "CONNECTIONSTRINGS__";

/// Resolves a connection string by instance name
pub trait ConnectionLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> ConnectionLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// In-memory named connection strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionStrings {
    entries: HashMap<String, String>,
}

impl ConnectionStrings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConnectionLookup for ConnectionStrings {
    fn lookup(&self, name: &str) -> Option<String> {
        self.entries
            .get(name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}

impl From<HashMap<String, String>> for ConnectionStrings {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

/// Connection strings read from environment variables
#[derive(Debug, Clone)]
pub struct EnvConnectionStrings {
    prefix: String,
}

impl EnvConnectionStrings {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `name`
    pub fn variable_name(&self, name: &str) -> String {
        let normalized: String = name
            .chars()
            .map(|c| match c {
                '-' | '.' | ':' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        format!("{}{}", self.prefix, normalized)
    }
}

impl Default for EnvConnectionStrings {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionLookup for EnvConnectionStrings {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(self.variable_name(name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Consults lookups in order and returns the first hit
#[derive(Default)]
pub struct ChainedConnectionLookup {
    lookups: Vec<Box<dyn ConnectionLookup + Send + Sync>>,
}

impl ChainedConnectionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<L>(mut self, lookup: L) -> Self
    where
        L: ConnectionLookup + Send + Sync + 'static,
    {
        self.lookups.push(Box::new(lookup));
        self
    }
}

impl ConnectionLookup for ChainedConnectionLookup {
    fn lookup(&self, name: &str) -> Option<String> {
        self.lookups.iter().find_map(|lookup| lookup.lookup(name))
    }
}

impl std::fmt::Debug for ChainedConnectionLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedConnectionLookup")
            .field("lookups", &self.lookups.len())
            .finish()
    }
}
