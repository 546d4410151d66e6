use crate::errors::ConfigError;
use crate::settings::InstanceSettings;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A declared instance key and its settings, if any were bound
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceEntry<I> {
    pub key: String,
    pub settings: Option<I>,
}

/// Root settings for one provider category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "I: Serialize", deserialize = "I: Deserialize<'de>"))]
pub struct ProviderSettings<I = InstanceSettings> {
    #[serde(default)]
    pub enable_tracing: bool,

    /// Declared instances, in declaration order
    #[serde(default, with = "ordered_instances")]
    pub instances: Vec<InstanceEntry<I>>,
}

impl<I> Default for ProviderSettings<I> {
    fn default() -> Self {
        Self {
            enable_tracing: false,
            instances: Vec::new(),
        }
    }
}

impl<I> ProviderSettings<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Declare an instance under `key`
    pub fn with_instance(mut self, key: impl Into<String>, settings: I) -> Self {
        self.instances.push(InstanceEntry {
            key: key.into(),
            settings: Some(settings),
        });
        self
    }

    /// Declare `key` without binding any settings to it
    pub fn with_missing_instance(mut self, key: impl Into<String>) -> Self {
        self.instances.push(InstanceEntry {
            key: key.into(),
            settings: None,
        });
        self
    }

    pub fn instance(&self, key: &str) -> Option<&I> {
        self.instances
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.settings.as_ref())
    }

    pub fn instance_keys(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|entry| entry.key.as_str())
    }
}

impl<I: DeserializeOwned> ProviderSettings<I> {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Instances are written as a mapping but kept as an ordered list
mod ordered_instances {
    use super::InstanceEntry;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<S, I>(entries: &[InstanceEntry<I>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        I: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for entry in entries {
            map.serialize_entry(&entry.key, &entry.settings)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, I>(deserializer: D) -> Result<Vec<InstanceEntry<I>>, D::Error>
    where
        D: Deserializer<'de>,
        I: Deserialize<'de>,
    {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }

    struct EntriesVisitor<I>(PhantomData<I>);

    impl<'de, I: Deserialize<'de>> Visitor<'de> for EntriesVisitor<I> {
        type Value = Vec<InstanceEntry<I>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of instance keys to instance settings")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, settings)) = access.next_entry::<String, Option<I>>()? {
                entries.push(InstanceEntry { key, settings });
            }
            Ok(entries)
        }
    }
}
