//! ursync - catalog-driven rsync orchestration
//!
//! A TOML catalog names *sites*, each a transfer from one endpoint to
//! another (local directory, removable drive, ssh host, MTP device, or a
//! rotating snapshot directory). ursync validates the catalog, probes
//! whether both ends of a site are reachable, compiles the rsync command
//! line (plus snapshot rotation steps) and runs it.

pub mod catalog;
pub mod compile;
pub mod config;
pub mod error;
pub mod notify;
pub mod probe;
pub mod run;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use catalog::{Catalog, Endpoint, EndpointKind, Site};
pub use compile::{compile, Invocation, InvocationPlan};
pub use config::{Config, Verbosity};
pub use error::{CatalogError, UrsyncError, UrsyncResult};
pub use probe::{is_available, resolve_site, Prober, SystemProber};
pub use run::{RunOptions, RunSummary, Runner};
