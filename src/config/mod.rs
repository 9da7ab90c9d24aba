//! Configuration module for ursync
//!
//! Settings are resolved in this order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (URSYNC_*)
//! 3. User config (~/.config/ursync/config.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    default_catalog_path, expand_home, user_config_path, ConfigWarning, EnvWarning, LoadedConfig,
};
pub use types::{CatalogConfig, ColorMode, Config, OutputConfig, ProbeConfig, RunConfig, Verbosity};
