//! Named service registry.
//!
//! Resolves services the way `$inject`-style containers do: before a bound
//! service is built, every name in its [`Binding::inject_names`] list is looked
//! up in the registry, and the results are passed to
//! [`Binding::instantiate_injected`]. Services are built once and cached.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::binding::Binding;
use crate::config::InjectConfig;
use crate::di::Injectable;
use crate::error::InjectError;
use crate::value::Value;

/// A type-erased bound service.
pub trait Service: Send + Sync {
    /// Display name of the service's target type.
    fn target(&self) -> &'static str;

    /// Names to resolve before construction, in argument order.
    fn inject_names(&self) -> &[String];

    /// Builds the service from values resolved for [`Service::inject_names`].
    fn create(&self, injected: Vec<Value>) -> Result<Value, InjectError>;
}

impl<T: Injectable> Service for Binding<T> {
    fn target(&self) -> &'static str {
        self.name()
    }

    fn inject_names(&self) -> &[String] {
        Binding::inject_names(self)
    }

    fn create(&self, injected: Vec<Value>) -> Result<Value, InjectError> {
        self.instantiate_injected(injected).map(Value::new)
    }
}

enum Entry {
    Value(Value),
    Service(Arc<dyn Service>),
}

/// Registry of named values and bound services.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: HashMap<String, Entry>,
    instances: HashMap<String, Value>,
    overrides: bool,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &InjectConfig) -> Self {
        Self {
            overrides: config.registry.overrides,
            ..Self::default()
        }
    }

    /// Registers a ready-made value under `name`.
    pub fn register_value(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<&mut Self, InjectError> {
        self.insert(name.into(), Entry::Value(value))
    }

    /// Registers a bound service under `name`. It is built on first lookup.
    pub fn register_service<T: Injectable>(
        &mut self,
        name: impl Into<String>,
        binding: Binding<T>,
    ) -> Result<&mut Self, InjectError> {
        self.insert(name.into(), Entry::Service(Arc::new(binding)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves `name`, building and caching services as needed.
    ///
    /// # Errors
    ///
    /// - `ServiceNotFound` if `name` or any name it depends on is unregistered
    /// - `CircularDependency` if resolution reaches a name already being resolved
    /// - any error raised while constructing a service
    pub fn get(&mut self, name: &str) -> Result<Value, InjectError> {
        let mut stack = Vec::new();
        self.resolve(name, &mut stack)
    }

    /// Resolves `name` and clones it out as a `T`.
    pub fn get_as<T: Any + Clone>(&mut self, name: &str) -> Result<T, InjectError> {
        let value = self.get(name)?;
        value
            .downcast::<T>()
            .ok_or_else(|| Self::type_error::<T>(name, &value))
    }

    /// Resolves `name` as a shared `Arc<T>`.
    pub fn get_arc<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Arc<T>, InjectError> {
        let value = self.get(name)?;
        value
            .downcast_arc::<T>()
            .ok_or_else(|| Self::type_error::<T>(name, &value))
    }

    fn insert(&mut self, name: String, entry: Entry) -> Result<&mut Self, InjectError> {
        if self.entries.contains_key(&name) {
            if !self.overrides {
                return Err(InjectError::DuplicateService(name));
            }
            // Cached services may have been built from the replaced entry
            debug!(service = %name, "Replacing registered service, clearing cached instances");
            self.instances.clear();
        }
        self.entries.insert(name, entry);
        Ok(self)
    }

    fn resolve(&mut self, name: &str, stack: &mut Vec<String>) -> Result<Value, InjectError> {
        if let Some(instance) = self.instances.get(name) {
            return Ok(instance.clone());
        }

        if stack.iter().any(|pending| pending == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(InjectError::CircularDependency { chain });
        }

        let service = match self.entries.get(name) {
            Some(Entry::Value(value)) => return Ok(value.clone()),
            Some(Entry::Service(service)) => Arc::clone(service),
            None => return Err(InjectError::ServiceNotFound(name.to_string())),
        };

        stack.push(name.to_string());
        let mut injected = Vec::with_capacity(service.inject_names().len());
        for dependency in service.inject_names() {
            injected.push(self.resolve(dependency, stack)?);
        }
        stack.pop();

        debug!(
            service = name,
            target_type = service.target(),
            dependencies = injected.len(),
            "Creating service"
        );
        let instance = service.create(injected)?;
        self.instances.insert(name.to_string(), instance.clone());
        Ok(instance)
    }

    fn type_error<T>(name: &str, value: &Value) -> InjectError {
        InjectError::ServiceType {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
            found: value.type_name(),
        }
    }
}
