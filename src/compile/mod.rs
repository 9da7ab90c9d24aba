//! Command compilation
//!
//! Turns an available site into an [`InvocationPlan`]: one `rsync`
//! transfer followed by the snapshot rotation steps, if any. Argument order
//! is fixed:
//!
//! ```text
//! rsync [-e "ssh -p P -i K"] [--link-dest D/last] FLAGS [--dry-run] FILTERS SOURCE DEST
//! ```

mod clock;
mod plan;
mod snapshot;

use thiserror::Error;

pub use clock::{Clock, SystemClock, SNAPSHOT_DATE_FORMAT};
pub use plan::{Invocation, InvocationPlan};
pub use snapshot::{count_snapshots, InvalidSnapBase, SnapshotTarget, DEFAULT_SNAP_BASE, LAST_LINK};

use crate::catalog::{Catalog, Endpoint};
use crate::probe::{resolve_site, Prober, SshAuth, Unavailable};

pub const TRANSFER_PROGRAM: &str = "rsync";

/// Why a site could not be compiled. Fatal for that site only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileFailure {
    #[error("site {site} is not available: {reason}")]
    Unavailable { site: String, reason: Unavailable },

    #[error("unable to compile ssh transport for site {site}: missing '{param}'")]
    MissingTransportParams { site: String, param: &'static str },

    #[error("unable to compile snapshot for site {site}: base name '{snap_base}' contains '/'")]
    InvalidSnapBase { site: String, snap_base: String },
}

impl CompileFailure {
    pub fn site(&self) -> &str {
        match self {
            CompileFailure::Unavailable { site, .. }
            | CompileFailure::MissingTransportParams { site, .. }
            | CompileFailure::InvalidSnapBase { site, .. } => site,
        }
    }
}

/// Compile the transfer for `site_id`.
///
/// Post-processing steps are only emitted for real runs; a dry run never
/// touches the destination.
pub fn compile(
    catalog: &Catalog,
    site_id: &str,
    dry_run: bool,
    prober: &dyn Prober,
    clock: &dyn Clock,
) -> Result<InvocationPlan, CompileFailure> {
    let site = resolve_site(catalog, site_id, prober).map_err(|reason| {
        CompileFailure::Unavailable {
            site: site_id.to_string(),
            reason,
        }
    })?;

    let mut rsync = Invocation::new(TRANSFER_PROGRAM);
    let mut post = Vec::new();

    if site.has_remote() {
        let auth = SshAuth::from_site(site).map_err(|param| {
            CompileFailure::MissingTransportParams {
                site: site.id.clone(),
                param,
            }
        })?;
        rsync.push("-e");
        rsync.push(format!("ssh -p {} -i {}", auth.port, auth.key));
    }

    let mut destination = site.destination.path_spec().to_string();
    if site.destination.snapshot {
        let target = SnapshotTarget::for_site(site, clock).map_err(|InvalidSnapBase(base)| {
            CompileFailure::InvalidSnapBase {
                site: site.id.clone(),
                snap_base: base,
            }
        })?;
        rsync.push("--link-dest");
        rsync.push(target.last.as_str());
        if !dry_run {
            post.push(Invocation::new("rm").args(["-f", target.last.as_str()]));
            post.push(Invocation::new("ln").args(["-s", target.dir.as_str(), target.last.as_str()]));
        }
        destination = target.dir;
    }

    for flag in site.flags.iter().filter(|f| !f.name.is_empty()) {
        rsync.push(flag.render());
    }
    if dry_run {
        rsync.push("--dry-run");
    }

    for filter in &site.filters {
        let [option, pattern] = filter.render();
        rsync.push(option);
        rsync.push(pattern);
    }

    rsync.push(normalize_source(&site.source));
    rsync.push(destination);

    tracing::debug!(site = %site.id, command = %rsync, post = post.len(), "compiled");
    Ok(InvocationPlan {
        primary: rsync,
        post,
    })
}

/// Apply rsync's trailing-slash convention: `preserve_dir` copies the
/// directory itself (no trailing `/`), otherwise its contents (trailing
/// `/`). Idempotent.
pub fn normalize_source(endpoint: &Endpoint) -> String {
    normalize_path(endpoint.path_spec(), endpoint.preserve_dir)
}

pub fn normalize_path(path: &str, preserve_dir: bool) -> String {
    if preserve_dir {
        // the root has no parent to copy into, so it keeps its slash
        match path.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        }
    } else if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
