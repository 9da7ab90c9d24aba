//! Error types for ursync
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.
//! Per-site failures (`Unavailable`, `CompileFailure`, `InvocationFailure`)
//! live next to the component that produces them.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::{CatalogWarning, Violation};

/// Result type alias for ursync operations
pub type UrsyncResult<T> = Result<T, UrsyncError>;

/// Fatal errors that stop a run before any site is processed.
#[derive(Error, Debug)]
pub enum UrsyncError {
    /// The site catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Invalid application config (`config.toml`)
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// No catalog exists at the resolved location
    #[error("no site catalog found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// A selected site id is not in the catalog
    #[error("site '{id}' does not exist in the catalog")]
    UnknownSite { id: String },

    /// The transfer tool is not installed
    #[error("rsync not found - install rsync or check PATH")]
    RsyncMissing,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading the site catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not well-formed TOML (or has values of the wrong shape)
    #[error("failed to parse catalog {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// The catalog parsed but failed validation
    #[error("catalog {file} has {} error(s)", violations.len())]
    Invalid {
        file: PathBuf,
        violations: Vec<Violation>,
        warnings: Vec<CatalogWarning>,
    },
}

impl CatalogError {
    /// Number of errors reported to the operator.
    pub fn count(&self) -> usize {
        match self {
            CatalogError::Invalid { violations, .. } => violations.len(),
            CatalogError::Io { .. } | CatalogError::Parse { .. } => 1,
        }
    }

    /// Individual validation violations (empty for IO and parse errors).
    pub fn violations(&self) -> &[Violation] {
        match self {
            CatalogError::Invalid { violations, .. } => violations,
            CatalogError::Io { .. } | CatalogError::Parse { .. } => &[],
        }
    }
}
