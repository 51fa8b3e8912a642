//! The injectable type contract.
//!
//! A type becomes bindable by implementing [`Injectable`], usually through
//! `#[derive(Injectable)]`, which consumes one constructor argument per field in
//! declaration order.
//!
//! # Example
//!
//! ```ignore
//! use inject::{inject, Injectable, Value};
//!
//! #[derive(Injectable)]
//! struct Logger;
//!
//! #[inject(42, named("$rootScope"), factory(Logger))]
//! #[derive(Injectable)]
//! struct Controller {
//!     answer: i32,
//!     scope: Value,
//!     logger: std::sync::Arc<Logger>,
//! }
//!
//! let binding = Controller::binding()?;
//! assert_eq!(binding.inject_names(), ["$rootScope"]);
//! let controller = binding.instantiate_injected(vec![Value::new(scope)])?;
//! ```

use crate::args::Args;
use crate::error::InjectError;

/// A type that can be built from positional constructor arguments.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Display name of the type, reported by bindings and errors.
    const NAME: &'static str;

    /// Builds an instance, consuming leading arguments from `args`.
    fn construct(args: &mut Args) -> Result<Self, InjectError>;
}

// Re-export macros
pub use inject_macros::{inject, Injectable};
