//! Validated catalog entities.
//!
//! Everything here is produced by `validate` and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of endpoint types a catalog may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Local,
    ExternalDrive,
    RemoteServer,
    AndroidDevice,
    Snapshot,
    Custom,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 6] = [
        EndpointKind::Local,
        EndpointKind::ExternalDrive,
        EndpointKind::RemoteServer,
        EndpointKind::AndroidDevice,
        EndpointKind::Snapshot,
        EndpointKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Local => "local",
            EndpointKind::ExternalDrive => "external_drive",
            EndpointKind::RemoteServer => "remote_server",
            EndpointKind::AndroidDevice => "android_device",
            EndpointKind::Snapshot => "snapshot",
            EndpointKind::Custom => "custom",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EndpointKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown endpoint type '{}'", s))
    }
}

/// Where an endpoint lives. Each variant keeps the literal location string
/// exactly as written in the catalog (trailing slashes are significant to
/// rsync).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local { path: String },
    ExternalDrive { path: String },
    /// `[user@]host:path`
    RemoteServer { spec: String },
    /// gvfs path of an MTP device, e.g. `/run/user/1000/gvfs/mtp:host=...`
    AndroidDevice { path: String },
    Snapshot { path: String },
    /// Declared but not implemented by any probe
    Custom { spec: String },
}

impl Location {
    pub fn new(kind: EndpointKind, path_spec: String) -> Self {
        match kind {
            EndpointKind::Local => Location::Local { path: path_spec },
            EndpointKind::ExternalDrive => Location::ExternalDrive { path: path_spec },
            EndpointKind::RemoteServer => Location::RemoteServer { spec: path_spec },
            EndpointKind::AndroidDevice => Location::AndroidDevice { path: path_spec },
            EndpointKind::Snapshot => Location::Snapshot { path: path_spec },
            EndpointKind::Custom => Location::Custom { spec: path_spec },
        }
    }

    pub fn kind(&self) -> EndpointKind {
        match self {
            Location::Local { .. } => EndpointKind::Local,
            Location::ExternalDrive { .. } => EndpointKind::ExternalDrive,
            Location::RemoteServer { .. } => EndpointKind::RemoteServer,
            Location::AndroidDevice { .. } => EndpointKind::AndroidDevice,
            Location::Snapshot { .. } => EndpointKind::Snapshot,
            Location::Custom { .. } => EndpointKind::Custom,
        }
    }

    /// The literal location string.
    pub fn path_spec(&self) -> &str {
        match self {
            Location::Local { path }
            | Location::ExternalDrive { path }
            | Location::AndroidDevice { path }
            | Location::Snapshot { path } => path,
            Location::RemoteServer { spec } | Location::Custom { spec } => spec,
        }
    }
}

/// One side of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub location: Location,
    /// Copy the directory itself rather than its contents (source only)
    pub preserve_dir: bool,
    /// Rotate snapshots inside this directory (destination only)
    pub snapshot: bool,
}

impl Endpoint {
    pub fn new(kind: EndpointKind, path_spec: impl Into<String>) -> Self {
        Self {
            location: Location::new(kind, path_spec.into()),
            preserve_dir: false,
            snapshot: false,
        }
    }

    pub fn with_preserve_dir(mut self, preserve_dir: bool) -> Self {
        self.preserve_dir = preserve_dir;
        self
    }

    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn kind(&self) -> EndpointKind {
        self.location.kind()
    }

    pub fn path_spec(&self) -> &str {
        self.location.path_spec()
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.location, Location::RemoteServer { .. })
    }
}

/// A transfer-tool flag token, rendered `-x` or `--long`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub long: bool,
}

impl Flag {
    pub fn short(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long: false,
        }
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long: true,
        }
    }

    pub fn render(&self) -> String {
        if self.long {
            format!("--{}", self.name)
        } else {
            format!("-{}", self.name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Include,
    Exclude,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Include => "include",
            FilterKind::Exclude => "exclude",
        }
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(FilterKind::Include),
            "exclude" => Ok(FilterKind::Exclude),
            other => Err(format!("unknown filter type '{}'", other)),
        }
    }
}

/// An include/exclude rule. Order in `Site::filters` is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub kind: FilterKind,
    pub pattern: String,
}

impl Filter {
    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Include,
            pattern: pattern.into(),
        }
    }

    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Exclude,
            pattern: pattern.into(),
        }
    }

    /// `["--include", pattern]` or `["--exclude", pattern]`
    pub fn render(&self) -> [String; 2] {
        [format!("--{}", self.kind.as_str()), self.pattern.clone()]
    }
}

/// A named transfer definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub params: BTreeMap<String, String>,
    pub flags: Vec<Flag>,
    pub filters: Vec<Filter>,
}

impl Site {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source: Endpoint,
        destination: Endpoint,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            destination,
            params: BTreeMap::new(),
            flags: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn endpoints(&self) -> [&Endpoint; 2] {
        [&self.source, &self.destination]
    }

    pub fn has_remote(&self) -> bool {
        self.source.is_remote() || self.destination.is_remote()
    }
}

/// Which run outcome a notification script reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Outcome::Success),
            "failure" => Ok(Outcome::Failure),
            other => Err(format!("unknown notification type '{}'", other)),
        }
    }
}

/// Shell command run after transfers; `%ID` is replaced with the processed
/// site ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub outcome: Outcome,
    pub command: String,
}

/// The validated, immutable site catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    sites: Vec<Site>,
    notifications: Vec<Notification>,
}

impl Catalog {
    pub(crate) fn from_parts(sites: Vec<Site>, notifications: Vec<Notification>) -> Self {
        Self {
            sites,
            notifications,
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.iter().find(|site| site.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.site(id).is_some()
    }

    pub fn notification(&self, outcome: Outcome) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.outcome == outcome)
    }
}
