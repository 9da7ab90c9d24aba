//! Availability resolution
//!
//! A site is available when both its source and destination resolve.
//! Each endpoint type has its own probe:
//!
//! | type | available when |
//! |---|---|
//! | `local` | the path is a directory |
//! | `external_drive` | a prefix of the path is a mount point and the path is a directory |
//! | `remote_server` | the host answers a ping and ssh finds the directory |
//! | `android_device` | the gvfs path exists and gio agrees under both addresses |
//! | `snapshot` | never (only derived inside another destination) |
//! | `custom` | never (no probe implemented) |

mod android;
mod prober;
mod remote;

use std::path::Path;

use thiserror::Error;

pub use android::mtp_uri;
pub use prober::{
    is_mount_point, run_bounded, BoundedOutput, Prober, SshAuth, SystemProber,
    DEFAULT_PROBE_TIMEOUT,
};
pub use remote::RemoteSpec;

use crate::catalog::{params, Catalog, Endpoint, Location, Site};

/// Why an endpoint (and therefore its site) is unavailable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    #[error("site '{0}' does not exist")]
    UnknownSite(String),

    #[error("{path} is not an existing directory")]
    NotADirectory { path: String },

    #[error("{path} is not on a mounted drive")]
    NotMounted { path: String },

    #[error("IP address or domain name not detected in '{spec}'")]
    RemoteHost { spec: String },

    #[error("remote location not detected in '{spec}'")]
    RemotePath { spec: String },

    #[error("remote endpoint requires the '{param}' parameter")]
    MissingTransportParams { param: &'static str },

    #[error("host {host} is unreachable")]
    HostUnreachable { host: String },

    #[error("directory {path} not found on {host}")]
    RemoteDirectory { host: String, path: String },

    #[error("android device at {path} is not mounted")]
    DeviceNotMounted { path: String },

    #[error("snapshot locations cannot be probed directly")]
    SnapshotEndpoint,

    #[error("location type '{kind}' has no implementation")]
    NotImplemented { kind: String },
}

impl<'a> SshAuth<'a> {
    /// Port and key from a site's params; the error names the first missing
    /// parameter.
    pub fn from_site(site: &'a Site) -> Result<Self, &'static str> {
        let port = site.param(params::SSH_PORT).ok_or(params::SSH_PORT)?;
        let key = site
            .param(params::SSH_KEY_LOCATION)
            .ok_or(params::SSH_KEY_LOCATION)?;
        Ok(Self { port, key })
    }
}

/// Whether a site can be transferred right now.
pub fn is_available(catalog: &Catalog, site_id: &str, prober: &dyn Prober) -> bool {
    resolve_site(catalog, site_id, prober).is_ok()
}

/// Resolve a site's endpoints, source first. The first failing endpoint
/// decides the reason.
pub fn resolve_site<'c>(
    catalog: &'c Catalog,
    site_id: &str,
    prober: &dyn Prober,
) -> Result<&'c Site, Unavailable> {
    let site = catalog
        .site(site_id)
        .ok_or_else(|| Unavailable::UnknownSite(site_id.to_string()))?;

    for endpoint in site.endpoints() {
        resolve_endpoint(site, endpoint, prober).inspect_err(|reason| {
            tracing::debug!(site = %site.id, kind = %endpoint.kind(), %reason, "endpoint unavailable");
        })?;
    }
    Ok(site)
}

/// Resolve a single endpoint of `site`.
pub fn resolve_endpoint(
    site: &Site,
    endpoint: &Endpoint,
    prober: &dyn Prober,
) -> Result<(), Unavailable> {
    match &endpoint.location {
        Location::Local { path } => require_dir(path),

        Location::ExternalDrive { path } => {
            if !on_mounted_drive(path, prober) {
                return Err(Unavailable::NotMounted { path: path.clone() });
            }
            require_dir(path)
        }

        Location::RemoteServer { spec } => {
            let remote = RemoteSpec::parse(spec)?;
            let auth = SshAuth::from_site(site)
                .map_err(|param| Unavailable::MissingTransportParams { param })?;

            if !prober.ping(&remote.host) {
                return Err(Unavailable::HostUnreachable {
                    host: remote.host.clone(),
                });
            }
            if !prober.remote_dir_exists(&remote, auth) {
                return Err(Unavailable::RemoteDirectory {
                    host: remote.destination(),
                    path: remote.path.clone(),
                });
            }
            Ok(())
        }

        Location::AndroidDevice { path } => {
            if !Path::new(path).exists() {
                return Err(Unavailable::DeviceNotMounted { path: path.clone() });
            }
            let uri = mtp_uri(path, prober.uid());
            if prober.device_info(path) != prober.device_info(&uri) {
                return Err(Unavailable::DeviceNotMounted { path: path.clone() });
            }
            Ok(())
        }

        Location::Snapshot { .. } => Err(Unavailable::SnapshotEndpoint),

        Location::Custom { .. } => Err(Unavailable::NotImplemented {
            kind: endpoint.kind().to_string(),
        }),
    }
}

fn require_dir(path: &str) -> Result<(), Unavailable> {
    if Path::new(path).is_dir() {
        Ok(())
    } else {
        Err(Unavailable::NotADirectory {
            path: path.to_string(),
        })
    }
}

/// Walk the path one character at a time and look for a mount point among
/// its prefixes. The filesystem root is skipped: every absolute path lives
/// below it.
fn on_mounted_drive(path: &str, prober: &dyn Prober) -> bool {
    path.char_indices()
        .map(|(i, c)| &path[..i + c.len_utf8()])
        .filter(|prefix| *prefix != "/")
        .any(|prefix| prober.is_mount_point(Path::new(prefix)))
}
