//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::catalog::{Catalog, Endpoint, EndpointKind, Site};
use crate::compile::Clock;
use crate::probe::{Prober, RemoteSpec, SshAuth};

/// Prober with scripted answers that records what it was asked.
#[derive(Debug, Default)]
pub(crate) struct FakeProber {
    pub reachable: HashSet<String>,
    /// `host:path` pairs that exist remotely
    pub remote_dirs: HashSet<String>,
    pub mounts: HashSet<PathBuf>,
    pub device_info: HashMap<String, String>,
    pub uid: u32,
    pub pings: RefCell<Vec<String>>,
    pub ssh_calls: RefCell<Vec<(String, String, String)>>,
}

impl FakeProber {
    pub fn with_host(mut self, host: &str) -> Self {
        self.reachable.insert(host.to_string());
        self
    }

    pub fn with_remote_dir(mut self, host: &str, path: &str) -> Self {
        self.remote_dirs.insert(format!("{}:{}", host, path));
        self
    }

    pub fn with_mount(mut self, path: impl Into<PathBuf>) -> Self {
        self.mounts.insert(path.into());
        self
    }

    pub fn with_device_info(mut self, location: &str, info: &str) -> Self {
        self.device_info
            .insert(location.to_string(), info.to_string());
        self
    }
}

impl Prober for FakeProber {
    fn ping(&self, host: &str) -> bool {
        self.pings.borrow_mut().push(host.to_string());
        self.reachable.contains(host)
    }

    fn remote_dir_exists(&self, remote: &RemoteSpec, auth: SshAuth<'_>) -> bool {
        self.ssh_calls.borrow_mut().push((
            remote.destination(),
            auth.port.to_string(),
            auth.key.to_string(),
        ));
        self.remote_dirs
            .contains(&format!("{}:{}", remote.host, remote.path))
    }

    fn is_mount_point(&self, path: &Path) -> bool {
        self.mounts.contains(path)
    }

    fn device_info(&self, location: &str) -> String {
        self.device_info
            .get(location)
            .cloned()
            .unwrap_or_else(|| format!("gio: {}: no such location", location))
    }

    fn uid(&self) -> u32 {
        self.uid
    }
}

/// Clock frozen at 2024-03-05 14:03:09.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock(pub NaiveDateTime);

impl Default for FixedClock {
    fn default() -> Self {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(14, 3, 9))
            .unwrap();
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub(crate) fn local(path: impl AsRef<Path>) -> Endpoint {
    Endpoint::new(EndpointKind::Local, path.as_ref().display().to_string())
}

pub(crate) fn endpoint(kind: EndpointKind, path: &str) -> Endpoint {
    Endpoint::new(kind, path)
}

pub(crate) fn site(id: &str, source: Endpoint, destination: Endpoint) -> Site {
    Site::new(id, id.to_uppercase(), source, destination)
}

pub(crate) fn catalog(sites: Vec<Site>) -> Catalog {
    Catalog::from_parts(sites, Vec::new())
}
