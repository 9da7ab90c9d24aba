//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::UrsyncResult;
use crate::probe::DEFAULT_PROBE_TIMEOUT;

use super::loader::{self, ConfigWarning, LoadedConfig};

/// Where the site catalog lives
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Overrides the default `<config dir>/ursync/sites.toml`; `~` expands
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            color: ColorMode::default(),
            unicode: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Verbosity level, lowest first.
///
/// `Silent` only reports catalog errors and fatal conditions, `Quiet` adds
/// per-site errors, `Normal` adds warnings and progress, `Verbose` shows the
/// compiled commands and `Debug` enables debug tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Resolve `-q`/`-v` counts against a configured base level. Flags win
    /// over the base; quiet wins over verbose.
    pub fn from_flags(quiet: u8, verbose: u8, base: Verbosity) -> Self {
        match (quiet, verbose) {
            (0, 0) => base,
            (0, 1) => Verbosity::Verbose,
            (0, _) => Verbosity::Debug,
            (1, _) => Verbosity::Quiet,
            _ => Verbosity::Silent,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Some(Verbosity::Silent),
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    pub fn shows_errors(self) -> bool {
        self >= Verbosity::Quiet
    }

    pub fn shows_warnings(self) -> bool {
        self >= Verbosity::Normal
    }

    pub fn shows_commands(self) -> bool {
        self >= Verbosity::Verbose
    }
}

/// Availability probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
        }
    }
}

fn default_probe_timeout() -> u64 {
    DEFAULT_PROBE_TIMEOUT
}

/// Run defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Notify after every site instead of once per run
    #[serde(default)]
    pub notify_each: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> UrsyncResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> UrsyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load the user config (or defaults), then apply env overrides.
    pub fn load_or_default() -> UrsyncResult<LoadedConfig> {
        loader::load_or_default()
    }

    /// Catalog location: explicit path, then config, then the default.
    pub fn catalog_path(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit.or(self.catalog.path.as_deref()) {
            Some(path) => loader::expand_home(path),
            None => loader::default_catalog_path(),
        }
    }
}
