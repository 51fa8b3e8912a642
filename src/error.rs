//! Error types for binding, instantiation and service resolution.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while binding or instantiating injectable types.
#[derive(Error, Debug)]
pub enum InjectError {
    // Constructor argument errors
    #[error("{target}: missing constructor argument at position {index}")]
    MissingArgument { target: &'static str, index: usize },

    #[error("{target}: argument {index} is a {found}, expected {expected}")]
    ArgumentType {
        target: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{target}: {count} constructor argument(s) left unconsumed")]
    UnconsumedArguments { target: &'static str, count: usize },

    #[error("{target}: expected {expected} argument(s), got {found}")]
    ArityMismatch {
        target: &'static str,
        expected: usize,
        found: usize,
    },

    // Named placeholder errors
    #[error("{target}: no value supplied for named placeholder '{name}'")]
    UnresolvedPlaceholder { target: &'static str, name: String },

    #[error("{target}: not a named placeholder: {name}")]
    UnknownPlaceholder { target: &'static str, name: String },

    // Resolution errors
    #[error("Factory '{factory}' failed: {source}")]
    Factory {
        factory: String,
        #[source]
        source: Box<InjectError>,
    },

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Service '{name}' is a {found}, expected {expected}")]
    ServiceType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Service already registered: {0}")]
    DuplicateService(String),

    #[error("Circular dependency: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
