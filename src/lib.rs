//! inject - constructor dependency binding
//!
//! Binds an ordered list of dependencies to an injectable type. The resolved
//! dependencies become the leading constructor arguments of every instance,
//! while call-site and named arguments can still override them.

// Lets derive-generated `::inject::` paths resolve inside this crate.
extern crate self as inject;

pub mod args;
pub mod binding;
pub mod config;
pub mod dependency;
pub mod di;
pub mod error;
pub mod registry;
pub mod value;

pub use args::Args;
pub use binding::{Ancestor, Binder, Binding};
pub use config::{ConfigError, InjectConfig, RegistryConfig};
pub use dependency::{Dependency, Factory};
pub use di::{inject, Injectable};
pub use error::InjectError;
pub use registry::{Service, ServiceRegistry};
pub use value::Value;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}
