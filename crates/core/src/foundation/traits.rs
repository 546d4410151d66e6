use crate::settings::{HealthOptions, InstanceSettings};

/// Instances that carry a logical name
pub trait Named {
    fn name(&self) -> &str;
}

/// Instances that carry a connection string the engine may rewrite
pub trait Connectable {
    fn connection_string(&self) -> Option<&str>;

    fn set_connection_string(&mut self, value: String);
}

/// Instances that may opt into a health probe
pub trait HealthConfigured {
    fn health_checks_enabled(&self) -> bool;

    fn health_options(&self) -> Option<&HealthOptions>;
}

/// Capability set the registrar requires from an instance settings type
pub trait InstanceConfig: Named + Connectable + HealthConfigured + Clone + Send + Sync + 'static {}

impl<T> InstanceConfig for T where
    T: Named + Connectable + HealthConfigured + Clone + Send + Sync + 'static
{
}

/// Provider-specific settings that embed the common [`InstanceSettings`].
///
/// Implementing this is enough to get [`Named`], [`Connectable`] and
/// [`HealthConfigured`] for free.
pub trait HasInstanceSettings {
    fn instance_settings(&self) -> &InstanceSettings;

    fn instance_settings_mut(&mut self) -> &mut InstanceSettings;
}

impl<T: HasInstanceSettings> Named for T {
    fn name(&self) -> &str {
        &self.instance_settings().name
    }
}

impl<T: HasInstanceSettings> Connectable for T {
    fn connection_string(&self) -> Option<&str> {
        self.instance_settings().connection_string.as_deref()
    }

    fn set_connection_string(&mut self, value: String) {
        self.instance_settings_mut().connection_string = Some(value);
    }
}

impl<T: HasInstanceSettings> HealthConfigured for T {
    fn health_checks_enabled(&self) -> bool {
        self.instance_settings().health_checks_enabled
    }

    fn health_options(&self) -> Option<&HealthOptions> {
        self.instance_settings().health_options.as_ref()
    }
}
