//! Subcommand handlers. Each returns the process exit code.

pub mod check;
pub mod list;
pub mod run;
pub mod show;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use ursync::config::Config;
use ursync::{Catalog, CatalogError, SystemProber, UrsyncError, Verbosity};

use crate::cli::Cli;
use crate::ui::context::UiContext;
use crate::ui::output::{
    print_catalog_error, print_catalog_location, print_catalog_warnings, print_config_warnings,
    print_warning,
};

/// The failure has already been shown to the user; only the exit code is left.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error already reported")
    }
}

impl std::error::Error for Reported {}

/// Settings shared by every subcommand.
pub struct Session {
    pub config: Config,
    pub ui: UiContext,
    pub catalog_path: PathBuf,
    custom_catalog: bool,
}

impl Session {
    pub fn new(cli: &Cli) -> Result<Self> {
        let loaded = Config::load_or_default()?;
        let config = loaded.config;
        let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose, config.output.verbosity);
        let ui = UiContext::new(cli.json, verbosity, cli.color, &config);

        print_config_warnings(&ui, &loaded.warnings);
        for warning in &loaded.env_warnings {
            print_warning(&ui, &warning.to_string());
        }

        let catalog_path = config.catalog_path(cli.input_file.as_deref());
        let custom_catalog = cli.input_file.is_some() || config.catalog.path.is_some();

        Ok(Self {
            config,
            ui,
            catalog_path,
            custom_catalog,
        })
    }

    /// Load and validate the catalog, reporting every problem found.
    pub fn load_catalog(&self) -> Result<Catalog> {
        if !self.catalog_path.is_file() {
            return Err(UrsyncError::CatalogNotFound {
                path: self.catalog_path.clone(),
            }
            .into());
        }
        print_catalog_location(&self.ui, &self.catalog_path, self.custom_catalog);

        match Catalog::load(&self.catalog_path) {
            Ok(loaded) => {
                print_catalog_warnings(&self.ui, &loaded.warnings);
                Ok(loaded.catalog)
            }
            Err(err) => {
                self.report_catalog_error(&err);
                Err(Reported.into())
            }
        }
    }

    fn report_catalog_error(&self, err: &CatalogError) {
        if self.ui.json {
            let errors: Vec<String> = match err {
                CatalogError::Invalid { violations, .. } => {
                    violations.iter().map(ToString::to_string).collect()
                }
                CatalogError::Io { .. } | CatalogError::Parse { .. } => vec![err.to_string()],
            };
            let _ = crate::ui::json::emit(&serde_json::json!({
                "event": "error",
                "kind": "catalog",
                "file": self.catalog_path.display().to_string(),
                "errors": errors,
                "count": err.count(),
            }));
        } else {
            print_catalog_error(&self.ui, err);
        }
    }

    pub fn prober(&self) -> SystemProber {
        SystemProber::new(Duration::from_secs(self.config.probe.timeout_secs))
    }
}

/// Every selected id must name a catalog site before anything runs.
pub fn require_sites<S: AsRef<str>>(
    catalog: &Catalog,
    ids: impl IntoIterator<Item = S>,
) -> Result<(), UrsyncError> {
    match ids.into_iter().find(|id| !catalog.contains(id.as_ref())) {
        Some(id) => Err(UrsyncError::UnknownSite {
            id: id.as_ref().to_string(),
        }),
        None => Ok(()),
    }
}
