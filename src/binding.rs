//! Binding injectable types to their dependencies.
//!
//! A [`Binder`] collects dependency descriptors and resolves them once, when
//! [`Binder::bind`] is called. The resulting [`Binding`] supplies the resolved
//! values as leading constructor arguments on every instantiation.
//!
//! # Argument merge
//!
//! - [`Binding::instantiate`] uses the resolved list as-is.
//! - [`Binding::instantiate_with`] overrides slots positionally from the front.
//!   Slots past the call arguments keep their injected values.
//! - [`Binding::instantiate_named`] substitutes named placeholders by key.
//! - [`Binding::instantiate_injected`] substitutes named placeholders in
//!   [`Binding::inject_names`] order, for containers following the `$inject`
//!   convention.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::args::Args;
use crate::config::InjectConfig;
use crate::dependency::Dependency;
use crate::di::Injectable;
use crate::error::InjectError;
use crate::value::Value;

/// A type in a binding's lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor {
    pub type_id: TypeId,
    pub name: &'static str,
}

#[derive(Debug, Clone)]
struct Parent {
    descriptors: Vec<Dependency>,
    lineage: Vec<Ancestor>,
}

/// Collects dependency descriptors for a target type.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    descriptors: Vec<Dependency>,
    parent: Option<Parent>,
    strict: bool,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a binder using the strictness from `config`.
    pub fn with_config(config: &InjectConfig) -> Self {
        Self::new().strict(config.strict)
    }

    /// Turns strict argument checking on or off.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn dependency(mut self, dependency: impl Into<Dependency>) -> Self {
        self.descriptors.push(dependency.into());
        self
    }

    pub fn dependencies<I>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = Dependency>,
    {
        self.descriptors.extend(dependencies);
        self
    }

    pub fn value<T: std::any::Any + Send + Sync>(self, value: T) -> Self {
        self.dependency(Dependency::value(value))
    }

    pub fn named(self, key: impl Into<String>) -> Self {
        self.dependency(Dependency::named(key))
    }

    pub fn factory<C: Injectable>(self) -> Self {
        self.dependency(Dependency::factory::<C>())
    }

    pub fn bound<C: Injectable>(self, binding: &Binding<C>) -> Self {
        self.dependency(Dependency::bound(binding))
    }

    /// Inherits the dependencies of `parent`.
    ///
    /// The parent's descriptors, including those it inherited, are placed
    /// ahead of this binder's own.
    pub fn extends<P: Injectable>(mut self, parent: &Binding<P>) -> Self {
        let mut lineage = parent.inner.ancestors.clone();
        lineage.push(Ancestor {
            type_id: TypeId::of::<P>(),
            name: P::NAME,
        });
        self.parent = Some(Parent {
            descriptors: parent.inner.descriptors.clone(),
            lineage,
        });
        self
    }

    /// Resolves every descriptor and binds them to `T`.
    ///
    /// Factories run here, once, in descriptor order.
    pub fn bind<T: Injectable>(self) -> Result<Binding<T>, InjectError> {
        let (mut descriptors, ancestors) = match self.parent {
            Some(parent) => (parent.descriptors, parent.lineage),
            None => (Vec::new(), Vec::new()),
        };
        descriptors.extend(self.descriptors);

        let mut slots = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let value = descriptor.resolve()?;
            trace!(target_type = T::NAME, index, ?value, "Resolved dependency");
            slots.push(Slot {
                value,
                placeholder: descriptor.placeholder().map(str::to_string),
            });
        }

        let inject = slots
            .iter()
            .filter_map(|slot| slot.placeholder.clone())
            .collect::<Vec<_>>();

        debug!(
            target_type = T::NAME,
            dependencies = slots.len(),
            placeholders = inject.len(),
            ancestors = ancestors.len(),
            "Bound dependencies"
        );

        Ok(Binding {
            inner: Arc::new(BindingInner {
                descriptors,
                slots,
                inject,
                ancestors,
                strict: self.strict,
            }),
            _target: PhantomData,
        })
    }
}

#[derive(Debug)]
struct Slot {
    value: Value,
    placeholder: Option<String>,
}

#[derive(Debug)]
struct BindingInner {
    descriptors: Vec<Dependency>,
    slots: Vec<Slot>,
    inject: Vec<String>,
    ancestors: Vec<Ancestor>,
    strict: bool,
}

/// A target type bound to its resolved dependencies.
///
/// Clones share the same resolved values.
pub struct Binding<T> {
    inner: Arc<BindingInner>,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _target: PhantomData,
        }
    }
}

impl<T: Injectable> Binding<T> {
    /// Display name of the target type.
    pub fn name(&self) -> &'static str {
        T::NAME
    }

    pub fn target_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    /// Named placeholders in argument order, ancestors first.
    ///
    /// This is the `$inject` list a named-dependency container resolves before
    /// calling [`Binding::instantiate_injected`].
    pub fn inject_names(&self) -> &[String] {
        &self.inner.inject
    }

    /// Descriptors as bound, ancestors first.
    pub fn descriptors(&self) -> &[Dependency] {
        &self.inner.descriptors
    }

    /// Resolved dependency values, in argument order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Value> {
        self.inner.slots.iter().map(|slot| &slot.value)
    }

    /// Bound ancestors, outermost first.
    pub fn ancestors(&self) -> &[Ancestor] {
        &self.inner.ancestors
    }

    /// Returns true if `U` is the target type or one of its bound ancestors.
    pub fn is_a<U: 'static>(&self) -> bool {
        let id = TypeId::of::<U>();
        id == TypeId::of::<T>() || self.inner.ancestors.iter().any(|a| a.type_id == id)
    }

    pub fn is_strict(&self) -> bool {
        self.inner.strict
    }

    /// Builds an instance from the resolved dependencies alone.
    pub fn instantiate(&self) -> Result<T, InjectError> {
        debug!(target_type = T::NAME, "Instantiating with injected arguments");
        self.construct(self.resolved())
    }

    /// Builds an instance, letting `call_args` override slots from the front.
    pub fn instantiate_with(&self, call_args: Vec<Value>) -> Result<T, InjectError> {
        if call_args.is_empty() {
            return self.instantiate();
        }

        let slots = self.inner.slots.len();
        if self.inner.strict && call_args.len() > slots {
            return Err(InjectError::ArityMismatch {
                target: T::NAME,
                expected: slots,
                found: call_args.len(),
            });
        }

        debug!(
            target_type = T::NAME,
            overrides = call_args.len(),
            "Instantiating with call-site arguments"
        );

        let overridden = call_args.len().min(slots);
        let mut args = call_args;
        args.extend(self.inner.slots[overridden..].iter().map(|s| s.value.clone()));
        self.construct(args)
    }

    /// Builds an instance, filling named placeholders from `named` by key.
    ///
    /// Keys that match no placeholder are logged and ignored. In strict mode
    /// they are rejected, with every unknown key listed in the error.
    pub fn instantiate_named(&self, named: &HashMap<String, Value>) -> Result<T, InjectError> {
        let mut unknown = named
            .keys()
            .filter(|key| !self.inner.inject.contains(key))
            .map(String::as_str)
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            let keys = unknown.join(", ");
            if self.inner.strict {
                return Err(InjectError::UnknownPlaceholder {
                    target: T::NAME,
                    name: keys,
                });
            }
            debug!(target_type = T::NAME, keys = %keys, "Ignoring unknown placeholders");
        }

        debug!(
            target_type = T::NAME,
            supplied = named.len(),
            "Instantiating with named arguments"
        );

        let mut args = Vec::with_capacity(self.inner.slots.len());
        for slot in &self.inner.slots {
            let value = match &slot.placeholder {
                Some(key) => match named.get(key) {
                    Some(value) => value.clone(),
                    None => self.unresolved(key, &slot.value)?,
                },
                None => slot.value.clone(),
            };
            args.push(value);
        }
        self.construct(args)
    }

    /// Builds an instance from values supplied in [`Binding::inject_names`]
    /// order.
    ///
    /// # Errors
    ///
    /// `ArityMismatch` unless exactly one value is supplied per placeholder.
    pub fn instantiate_injected(&self, injected: Vec<Value>) -> Result<T, InjectError> {
        if injected.len() != self.inner.inject.len() {
            return Err(InjectError::ArityMismatch {
                target: T::NAME,
                expected: self.inner.inject.len(),
                found: injected.len(),
            });
        }

        debug!(
            target_type = T::NAME,
            injected = injected.len(),
            "Instantiating with injected placeholders"
        );

        let mut injected = injected.into_iter();
        let args = self
            .inner
            .slots
            .iter()
            .map(|slot| match slot.placeholder {
                Some(_) => injected.next().unwrap_or_else(|| slot.value.clone()),
                None => slot.value.clone(),
            })
            .collect();
        self.construct(args)
    }

    fn resolved(&self) -> Vec<Value> {
        self.inner.slots.iter().map(|s| s.value.clone()).collect()
    }

    fn unresolved(&self, key: &str, fallback: &Value) -> Result<Value, InjectError> {
        if self.inner.strict {
            return Err(InjectError::UnresolvedPlaceholder {
                target: T::NAME,
                name: key.to_string(),
            });
        }
        Ok(fallback.clone())
    }

    fn construct(&self, values: Vec<Value>) -> Result<T, InjectError> {
        let mut args = Args::new(T::NAME, values);
        let instance = T::construct(&mut args)?;

        let leftover = args.remaining();
        if leftover > 0 {
            if self.inner.strict {
                return Err(InjectError::UnconsumedArguments {
                    target: T::NAME,
                    count: leftover,
                });
            }
            debug!(target_type = T::NAME, leftover, "Unconsumed constructor arguments");
        }
        Ok(instance)
    }
}

impl<T: Injectable> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &T::NAME)
            .field("dependencies", &self.inner.slots.len())
            .field("inject", &self.inner.inject)
            .field("strict", &self.inner.strict)
            .finish()
    }
}

impl<T: Injectable> fmt::Display for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::NAME)
    }
}
