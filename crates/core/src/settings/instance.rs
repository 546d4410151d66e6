use crate::foundation::HasInstanceSettings;
use crate::settings::HealthOptions;
use serde::{Deserialize, Serialize};

/// One configured instance of a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSettings {
    /// Logical name, also used as the named-connection lookup key
    pub name: String,

    /// Inline connection string, used when no named connection resolves
    pub connection_string: Option<String>,

    pub health_checks_enabled: bool,

    pub health_options: Option<HealthOptions>,
}

impl InstanceSettings {
    /// Create instance settings with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the inline connection string
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Enable health checks with the given options
    pub fn with_health_checks(mut self, options: HealthOptions) -> Self {
        self.health_checks_enabled = true;
        self.health_options = Some(options);
        self
    }
}

impl HasInstanceSettings for InstanceSettings {
    fn instance_settings(&self) -> &InstanceSettings {
        self
    }

    fn instance_settings_mut(&mut self) -> &mut InstanceSettings {
        self
    }
}
