//! Keyed service sink and locator.
//!
//! The registration engine treats the service container as opaque: providers
//! receive a [`ServiceCollection`] to add their instance services to, and
//! health-check factories receive a [`ServiceLocator`] to fetch them back.
//! [`KeyedServiceRegistry`] implements both for applications without a
//! container of their own.

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, type-erased service instance
pub type SharedService = Arc<dyn Any + Send + Sync>;

/// Sink for services constructed by a provider's `add_instance` hook
pub trait ServiceCollection {
    fn add_keyed_service(
        &mut self,
        type_id: TypeId,
        type_name: &'static str,
        key: &str,
        service: SharedService,
    );
}

impl dyn ServiceCollection + '_ {
    /// Add a typed service under an instance key
    pub fn add_keyed<T>(&mut self, key: &str, service: T)
    where
        T: Any + Send + Sync,
    {
        self.add_keyed_service(
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            key,
            Arc::new(service),
        );
    }
}

/// Read access to services, handed to health-check factories
pub trait ServiceLocator: Send + Sync {
    fn get_keyed_service(&self, type_id: TypeId, key: &str) -> Option<SharedService>;
}

impl dyn ServiceLocator + '_ {
    /// Resolve a typed service registered under an instance key
    pub fn resolve_keyed<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get_keyed_service(TypeId::of::<T>(), key)?
            .downcast::<T>()
            .ok()
    }
}

struct ServiceEntry {
    type_name: &'static str,
    instance: SharedService,
}

impl std::fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("type_name", &self.type_name)
            .field("instance", &"<instance>")
            .finish()
    }
}

/// Registry of keyed singleton services
#[derive(Debug, Default, Clone)]
pub struct KeyedServiceRegistry {
    services: Arc<RwLock<HashMap<(TypeId, String), ServiceEntry>>>,
}

impl KeyedServiceRegistry {
    /// Create a new service registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed service under an instance key, replacing any previous one
    pub fn register_keyed<T>(&self, key: &str, service: T)
    where
        T: Any + Send + Sync,
    {
        self.insert(
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            key,
            Arc::new(service),
        );
    }

    /// Resolve a typed service registered under an instance key
    pub fn resolve<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let services = self.services.read();
        let entry = services.get(&(TypeId::of::<T>(), key.to_string()))?;
        entry.instance.clone().downcast::<T>().ok()
    }

    /// Check if a typed service is registered under the key
    pub fn contains<T>(&self, key: &str) -> bool
    where
        T: Any + Send + Sync,
    {
        self.services
            .read()
            .contains_key(&(TypeId::of::<T>(), key.to_string()))
    }

    /// Get the number of registered services
    pub fn service_count(&self) -> usize {
        self.services.read().len()
    }

    /// `(type name, key)` pairs of every registered service, sorted
    pub fn registered_services(&self) -> Vec<(&'static str, String)> {
        let mut registered: Vec<_> = self
            .services
            .read()
            .iter()
            .map(|((_, key), entry)| (entry.type_name, key.clone()))
            .collect();
        registered.sort();
        registered
    }

    fn insert(&self, type_id: TypeId, type_name: &'static str, key: &str, service: SharedService) {
        let previous = self.services.write().insert(
            (type_id, key.to_string()),
            ServiceEntry {
                type_name,
                instance: service,
            },
        );
        if previous.is_some() {
            tracing::debug!(service = type_name, key, "Replaced keyed service");
        }
    }
}

impl ServiceCollection for KeyedServiceRegistry {
    fn add_keyed_service(
        &mut self,
        type_id: TypeId,
        type_name: &'static str,
        key: &str,
        service: SharedService,
    ) {
        self.insert(type_id, type_name, key, service);
    }
}

impl ServiceLocator for KeyedServiceRegistry {
    fn get_keyed_service(&self, type_id: TypeId, key: &str) -> Option<SharedService> {
        self.services
            .read()
            .get(&(type_id, key.to_string()))
            .map(|entry| entry.instance.clone())
    }
}
