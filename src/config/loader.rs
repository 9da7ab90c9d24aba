//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{UrsyncError, UrsyncResult};

use super::types::{ColorMode, Config, Verbosity};

pub const CONFIG_DIR: &str = "ursync";
pub const CONFIG_FILE: &str = "config.toml";
pub const CATALOG_FILE: &str = "sites.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// An `URSYNC_*` variable whose value could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvWarning {
    pub var: &'static str,
    pub value: String,
}

impl fmt::Display for EnvWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ignoring invalid {} value '{}'", self.var, self.value)
    }
}

/// Resolved configuration plus everything worth telling the user about it.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    pub env_warnings: Vec<EnvWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> UrsyncResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| UrsyncError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// User config if present, defaults otherwise; env overrides on top.
///
/// A config file that exists but does not parse is an error rather than a
/// silent fallback.
pub fn load_or_default() -> UrsyncResult<LoadedConfig> {
    let (config, warnings) = match user_config_path() {
        Some(path) if path.is_file() => load_with_warnings(&path)?,
        _ => (Config::default(), Vec::new()),
    };
    let (config, env_warnings) = with_env_overrides(config, |key| std::env::var(key).ok());
    Ok(LoadedConfig {
        config,
        warnings,
        env_warnings,
    })
}

/// Apply `URSYNC_*` overrides read through `env`. Unusable values are
/// skipped and returned as warnings.
pub fn with_env_overrides(
    mut config: Config,
    env: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<EnvWarning>) {
    let mut warnings = Vec::new();

    if let Some(path) = env("URSYNC_CATALOG").filter(|p| !p.is_empty()) {
        config.catalog.path = Some(PathBuf::from(path));
    }

    if let Some(verbosity) = env("URSYNC_VERBOSITY") {
        match Verbosity::parse(&verbosity) {
            Some(v) => config.output.verbosity = v,
            None => warnings.push(EnvWarning {
                var: "URSYNC_VERBOSITY",
                value: verbosity,
            }),
        }
    }

    if let Some(timeout) = env("URSYNC_PROBE_TIMEOUT") {
        match timeout.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.probe.timeout_secs = secs,
            _ => warnings.push(EnvWarning {
                var: "URSYNC_PROBE_TIMEOUT",
                value: timeout,
            }),
        }
    }

    // any non-empty value disables color
    if env("URSYNC_NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.output.color = ColorMode::Never;
    }

    (config, warnings)
}

/// `$XDG_CONFIG_HOME/ursync/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs_config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// `$XDG_CONFIG_HOME/ursync/sites.toml`, or `./sites.toml` without a home.
pub fn default_catalog_path() -> PathBuf {
    dirs_config_dir()
        .map(|d| d.join(CONFIG_DIR).join(CATALOG_FILE))
        .unwrap_or_else(|| PathBuf::from(CATALOG_FILE))
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

pub(crate) fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "catalog",
        "path",
        "output",
        "verbosity",
        "color",
        "unicode",
        "probe",
        "timeout_secs",
        "run",
        "notify_each",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
