//! Dependency descriptors.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::binding::Binding;
use crate::di::Injectable;
use crate::error::InjectError;
use crate::value::Value;

type MakeFn = dyn Fn() -> Result<Value, InjectError> + Send + Sync;

/// A no-argument constructor, run once when a binding is created.
#[derive(Clone)]
pub struct Factory {
    name: Cow<'static, str>,
    make: Arc<MakeFn>,
}

impl Factory {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, make: F) -> Self
    where
        F: Fn() -> Result<Value, InjectError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            make: Arc::new(make),
        }
    }

    /// Constructs `C` from an empty argument list.
    pub fn of<C: Injectable>() -> Self {
        Self::new(C::NAME, || {
            let mut args = Args::empty(C::NAME);
            C::construct(&mut args).map(Value::new)
        })
    }

    /// Instantiates `C` through an existing binding, with its injected arguments.
    pub fn from_binding<C: Injectable>(binding: &Binding<C>) -> Self {
        let binding = binding.clone();
        Self::new(C::NAME, move || binding.instantiate().map(Value::new))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the factory.
    pub fn produce(&self) -> Result<Value, InjectError> {
        (self.make)().map_err(|source| InjectError::Factory {
            factory: self.name.to_string(),
            source: Box::new(source),
        })
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Factory").field(&self.name).finish()
    }
}

/// Describes one injected constructor argument.
///
/// Descriptor kinds are tagged explicitly: nothing is instantiated unless it is
/// a [`Dependency::Factory`].
#[derive(Debug, Clone)]
pub enum Dependency {
    /// Passed through unchanged.
    Value(Value),
    /// Instantiated once at bind time.
    Factory(Factory),
    /// Placeholder filled by name at instantiation time.
    Named(String),
}

impl Dependency {
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Value::new(value))
    }

    pub fn named(key: impl Into<String>) -> Self {
        Self::Named(key.into())
    }

    pub fn factory<C: Injectable>() -> Self {
        Self::Factory(Factory::of::<C>())
    }

    /// A dependency on another bound type.
    pub fn bound<C: Injectable>(binding: &Binding<C>) -> Self {
        Self::Factory(Factory::from_binding(binding))
    }

    /// The placeholder key, if this is a named placeholder.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Named(key) => Some(key),
            _ => None,
        }
    }

    /// Resolves this descriptor to the value used at construction time.
    pub fn resolve(&self) -> Result<Value, InjectError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Factory(factory) => factory.produce(),
            Self::Named(key) => Ok(Value::new(key.clone())),
        }
    }
}

impl From<Value> for Dependency {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Factory> for Dependency {
    fn from(factory: Factory) -> Self {
        Self::Factory(factory)
    }
}

impl<C: Injectable> From<&Binding<C>> for Dependency {
    fn from(binding: &Binding<C>) -> Self {
        Self::bound(binding)
    }
}
