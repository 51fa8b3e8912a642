//! Type-erased dependency values.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A reference-counted, type-erased value handed to constructors.
///
/// Cloning a `Value` shares the same allocation, so a value injected at bind
/// time is observed by every instance through [`Value::ptr_eq`].
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps a value. Passing a `Value` returns it unchanged.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        match boxed.downcast::<Value>() {
            Ok(existing) => *existing,
            Err(boxed) => Self {
                inner: Arc::from(boxed),
                type_name: type_name::<T>(),
            },
        }
    }

    /// Wraps an existing shared value without re-allocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// Name of the wrapped type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clones the wrapped value out as a `T`.
    ///
    /// Asking for `Value` itself returns this handle, identity preserved.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        if let Some(this) = (self as &dyn Any).downcast_ref::<T>() {
            return Some(this.clone());
        }
        self.inner.downcast_ref::<T>().cloned()
    }

    /// Returns a shared handle to the wrapped `T`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns true if both handles point to the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.downcast_ref::<String>() {
            return write!(f, "Value({:?})", s);
        }
        write!(f, "Value(<{}>)", self.type_name)
    }
}
