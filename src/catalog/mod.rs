//! Site catalog
//!
//! The catalog is a TOML document of `[[site]]` and `[[notification]]`
//! entries. Loading parses it permissively, validates the whole document
//! (accumulating every violation), and yields an immutable [`Catalog`].
//!
//! ```toml
//! [[notification]]
//! type = "success"
//! command = "notify-send 'ursync' 'done: %ID'"
//!
//! [[site]]
//! id = "docs"
//! name = "Documents"
//! source = { type = "local", path = "/home/me/docs" }
//! destination = { type = "external_drive", path = "/media/usb/docs", snapshot = true }
//! params = { snap_base = "daily.", snap_extension = "date" }
//! flags = [{ name = "a" }, { name = "delete", long = true }]
//! filters = [{ type = "exclude", pattern = "*.tmp" }]
//! ```

mod model;
mod raw;
mod validate;

use std::fs;
use std::path::Path;

pub use model::{
    Catalog, Endpoint, EndpointKind, Filter, FilterKind, Flag, Location, Notification, Outcome,
    Site,
};
pub use validate::{CatalogWarning, Violation};

use crate::error::CatalogError;
use raw::RawCatalog;

/// Site parameter names the resolver and compiler understand.
pub mod params {
    pub const SSH_PORT: &str = "ssh_port";
    pub const SSH_KEY_LOCATION: &str = "ssh_key_location";
    pub const SNAP_BASE: &str = "snap_base";
    pub const SNAP_EXTENSION: &str = "snap_extension";
}

/// A successfully loaded catalog with the non-fatal warnings raised while
/// validating it.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogWarning>,
}

impl Catalog {
    /// Read and validate a catalog file.
    pub fn load(path: &Path) -> Result<Loaded, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            file: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Validate catalog text; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Loaded, CatalogError> {
        let mut ignored: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(content);

        let raw: RawCatalog = serde_ignored::deserialize(deserializer, |p| {
            ignored.push(key_path(&p.to_string()));
        })
        .map_err(|e| CatalogError::Parse {
            file: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_empty = content.trim().is_empty();
        let validation = validate::validate(&raw, &ignored, is_empty);

        match validation.result {
            Ok(catalog) => {
                tracing::debug!(
                    sites = catalog.sites().len(),
                    warnings = validation.warnings.len(),
                    "catalog loaded"
                );
                Ok(Loaded {
                    catalog,
                    warnings: validation.warnings,
                })
            }
            Err(violations) => Err(CatalogError::Invalid {
                file: origin.to_path_buf(),
                violations,
                warnings: validation.warnings,
            }),
        }
    }
}

/// Dotted key path without the `?` segments optional fields add.
fn key_path(raw: &str) -> String {
    raw.split('.')
        .filter(|segment| *segment != "?")
        .collect::<Vec<_>>()
        .join(".")
}
