//! Positional constructor arguments.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::error::InjectError;
use crate::value::Value;

/// Cursor over the final argument list passed to [`Injectable::construct`].
///
/// Arguments are consumed front to back. Base types built through
/// `#[injectable(base)]` share the same cursor, so they take the leading
/// arguments before the derived type's own fields.
///
/// [`Injectable::construct`]: crate::Injectable::construct
#[derive(Debug)]
pub struct Args {
    target: &'static str,
    values: Vec<Value>,
    position: usize,
}

impl Args {
    pub fn new(target: &'static str, values: Vec<Value>) -> Self {
        Self {
            target,
            values,
            position: 0,
        }
    }

    /// An empty argument list, as used by no-argument factories.
    pub fn empty(target: &'static str) -> Self {
        Self::new(target, Vec::new())
    }

    /// Name of the type being constructed.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Index of the next argument to be consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of arguments not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes the next argument without inspecting its type.
    pub fn next_value(&mut self) -> Result<Value, InjectError> {
        let value = self
            .values
            .get(self.position)
            .cloned()
            .ok_or(InjectError::MissingArgument {
                target: self.target,
                index: self.position,
            })?;
        self.position += 1;
        Ok(value)
    }

    /// Takes the next argument as a `T`.
    ///
    /// # Errors
    ///
    /// `MissingArgument` when the list is exhausted, `ArgumentType` when the
    /// argument holds another type. The cursor does not advance on error.
    pub fn take<T: Any + Clone>(&mut self) -> Result<T, InjectError> {
        let value = self.peek()?;
        let typed = value.downcast::<T>().ok_or_else(|| self.type_error::<T>(value))?;
        self.position += 1;
        Ok(typed)
    }

    /// Takes the next argument as a shared `Arc<T>`.
    pub fn take_arc<T: Any + Send + Sync>(&mut self) -> Result<Arc<T>, InjectError> {
        let value = self.peek()?;
        let typed = value
            .downcast_arc::<T>()
            .ok_or_else(|| self.type_error::<T>(value))?;
        self.position += 1;
        Ok(typed)
    }

    /// Like [`Args::take`], but yields `None` once the list is exhausted.
    pub fn take_optional<T: Any + Clone>(&mut self) -> Result<Option<T>, InjectError> {
        if self.is_exhausted() {
            return Ok(None);
        }
        self.take::<T>().map(Some)
    }

    fn peek(&self) -> Result<&Value, InjectError> {
        self.values
            .get(self.position)
            .ok_or(InjectError::MissingArgument {
                target: self.target,
                index: self.position,
            })
    }

    fn type_error<T>(&self, found: &Value) -> InjectError {
        InjectError::ArgumentType {
            target: self.target,
            index: self.position,
            expected: type_name::<T>(),
            found: found.type_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: Vec<Value>) -> Args {
        Args::new("Test", values)
    }

    #[test]
    fn test_take_in_order() {
        let mut args = args(vec![Value::new(1i32), Value::new(String::from("abc"))]);
        assert_eq!(args.take::<i32>().unwrap(), 1);
        assert_eq!(args.take::<String>().unwrap(), "abc");
        assert!(args.is_exhausted());
    }

    #[test]
    fn test_take_missing() {
        let mut args = args(vec![]);
        let err = args.take::<i32>().unwrap_err();
        assert!(matches!(
            err,
            InjectError::MissingArgument {
                target: "Test",
                index: 0
            }
        ));
    }

    #[test]
    fn test_take_wrong_type_does_not_advance() {
        let mut args = args(vec![Value::new(true)]);
        let err = args.take::<i32>().unwrap_err();
        assert!(matches!(err, InjectError::ArgumentType { index: 0, found: "bool", .. }));
        assert_eq!(args.position(), 0);
        assert!(args.take::<bool>().unwrap());
    }

    #[test]
    fn test_take_optional_when_exhausted() {
        let mut args = args(vec![Value::new(5u64)]);
        assert_eq!(args.take_optional::<u64>().unwrap(), Some(5));
        assert_eq!(args.take_optional::<u64>().unwrap(), None);
    }

    #[test]
    fn test_take_arc_and_value() {
        let shared = Value::new(vec![1u8, 2]);
        let mut args = args(vec![shared.clone(), shared.clone()]);
        let arc = args.take_arc::<Vec<u8>>().unwrap();
        assert_eq!(*arc, vec![1, 2]);
        let raw = args.take::<Value>().unwrap();
        assert!(raw.ptr_eq(&shared));
        assert_eq!(args.remaining(), 0);
    }
}
