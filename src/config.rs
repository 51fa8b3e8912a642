//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/inject/config.toml` (XDG) or platform config dir
//! 2. Project config: `.inject.toml`
//! 3. Environment variables: `INJECT_*`
//!
//! Every setting has a default, so no file is required.
//!
//! ```toml
//! strict = true
//!
//! [registry]
//! overrides = false
//! ```

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InjectConfig {
    /// Reject surplus, unknown or unresolved arguments instead of tolerating them.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Service registry settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Allow re-registering a name, replacing the earlier entry.
    #[serde(default)]
    pub overrides: bool,
}

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "INJECT_";

/// Project-level config file name.
pub const PROJECT_CONFIG: &str = ".inject.toml";

impl InjectConfig {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layers(Self::user_config_path(), PROJECT_CONFIG)
    }

    /// Layer `user`, then `project`, then the environment. Missing files are skipped.
    pub fn load_layers(
        user: impl AsRef<Path>,
        project: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::new()
                // Layer 1: User config (lowest priority)
                .merge(Toml::file(user.as_ref()))
                // Layer 2: Project config
                .merge(Toml::file(project.as_ref())),
        )
    }

    /// Load a single config file, still overridable from the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::extract(Figment::new().merge(Toml::file(path.as_ref())))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            // Environment variables (highest priority)
            .merge(Env::prefixed(ENV_PREFIX).split("_"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/inject/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("inject").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("inject").join("config.toml"))
            .unwrap_or_default()
    }
}
