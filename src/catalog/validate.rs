//! Whole-catalog validation.
//!
//! Every check runs; violations accumulate and are reported together.

use std::collections::HashSet;
use std::fmt;

use super::model::{
    Catalog, Endpoint, EndpointKind, Filter, FilterKind, Flag, Notification, Outcome, Site,
};
use super::raw::{OneOrMany, RawCatalog, RawEndpoint, RawSite};

/// A single failed validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The catalog document has no content
    EmptyCatalog,
    /// Top-level keys other than `site` and `notification`
    UnknownRootKeys { keys: Vec<String> },
    /// No `[[site]]` entries
    NoSites,
    /// A site lacks `id` or `name`
    MissingIdOrName { site: String },
    /// Two sites share an id
    DuplicateId { id: String },
    /// Keys inside a site other than the recognized ones
    UnknownSiteKeys { site: String, keys: Vec<String> },
    /// Not exactly one source and one destination
    EndpointCount { site: String },
    /// Source or destination without a path
    IncompleteEndpoint { site: String },
    /// Source or destination without a type
    MissingEndpointType { site: String },
    /// Source or destination type outside the fixed enumeration
    UnknownEndpointType { site: String, kind: String },
    /// More than one script per outcome, or more than two overall
    TooManyNotifications,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptyCatalog => write!(f, "sites file is empty"),
            Violation::UnknownRootKeys { keys } => {
                write!(f, "unknown elements found at catalog root: {}", keys.join(", "))
            }
            Violation::NoSites => write!(f, "no sites configured in sites file"),
            Violation::MissingIdOrName { site } => write!(f, "site {} has no name or id", site),
            Violation::DuplicateId { id } => {
                write!(f, "one or more sites share the id '{}'", id)
            }
            Violation::UnknownSiteKeys { site, keys } => {
                write!(f, "unknown elements found in site {}: {}", site, keys.join(", "))
            }
            Violation::EndpointCount { site } => write!(
                f,
                "site {} must have exactly one source and one destination",
                site
            ),
            Violation::IncompleteEndpoint { site } => {
                write!(f, "site {} has an incomplete source/destination", site)
            }
            Violation::MissingEndpointType { site } => write!(
                f,
                "site {}'s source/destination does not have a type (see `ursync types`)",
                site
            ),
            Violation::UnknownEndpointType { site, kind } => write!(
                f,
                "site {} uses unknown source/destination type '{}' (see `ursync types`)",
                site, kind
            ),
            Violation::TooManyNotifications => {
                write!(f, "too many notification scripts in sites file")
            }
        }
    }
}

/// Non-fatal catalog problem surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// Some entry has empty text; may produce malformed invocations later
    EmptyEntries,
    /// A notification with a type other than success/failure (ignored)
    UnknownNotificationType { kind: String },
    /// A filter with a type other than include/exclude (ignored)
    UnknownFilterType { site: String, kind: String },
    /// An unrecognized key below site level (ignored)
    UnknownKey { path: String },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::EmptyEntries => write!(
                f,
                "empty entries exist in sites file; may cause problems with program execution"
            ),
            CatalogWarning::UnknownNotificationType { kind } => {
                write!(f, "ignoring notification with unknown type '{}'", kind)
            }
            CatalogWarning::UnknownFilterType { site, kind } => {
                write!(f, "ignoring filter with unknown type '{}' in site {}", kind, site)
            }
            CatalogWarning::UnknownKey { path } => write!(f, "ignoring unknown key '{}'", path),
        }
    }
}

const SITE_KEY: &str = "site";

/// Outcome of validation: the catalog (when no check failed) plus warnings.
pub(crate) struct Validation {
    pub result: Result<Catalog, Vec<Violation>>,
    pub warnings: Vec<CatalogWarning>,
}

/// Validate a deserialized catalog.
///
/// `ignored` holds the dotted paths `serde_ignored` reported as unknown;
/// `is_empty` is true when the document had no content at all.
pub(crate) fn validate(raw: &RawCatalog, ignored: &[String], is_empty: bool) -> Validation {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    let (root_unknown, site_unknown, deep_unknown) = classify_ignored(ignored);

    if is_empty {
        violations.push(Violation::EmptyCatalog);
    }

    if too_many_notifications(raw) {
        violations.push(Violation::TooManyNotifications);
    }

    if raw.site.is_empty() {
        violations.push(Violation::NoSites);
    }

    if !root_unknown.is_empty() {
        violations.push(Violation::UnknownRootKeys { keys: root_unknown });
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut sites = Vec::new();

    for (index, raw_site) in raw.site.iter().enumerate() {
        let label = site_label(raw_site, index);

        let id = non_empty(raw_site.id.as_deref());
        let name = non_empty(raw_site.name.as_deref());
        if id.is_none() || name.is_none() {
            violations.push(Violation::MissingIdOrName {
                site: label.clone(),
            });
        }

        if let Some(id) = id {
            if !seen_ids.insert(id) {
                violations.push(Violation::DuplicateId { id: id.to_string() });
            }
        }

        let unknown: Vec<String> = site_unknown
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, key)| key.clone())
            .collect();
        if !unknown.is_empty() {
            violations.push(Violation::UnknownSiteKeys {
                site: label.clone(),
                keys: unknown,
            });
        }

        let endpoints = match check_endpoints(raw_site, &label) {
            Ok(pair) => Some(pair),
            Err(violation) => {
                violations.push(violation);
                None
            }
        };

        if let (Some(id), Some(name), Some((source, destination))) = (id, name, endpoints) {
            let mut site = Site::new(id, name, source, destination);
            site.params = raw_site.params.clone();
            site.flags = build_flags(raw_site);
            site.filters = build_filters(raw_site, &label, &mut warnings);
            sites.push(site);
        }
    }

    let notifications = build_notifications(raw, &mut warnings);

    for path in deep_unknown {
        warnings.push(CatalogWarning::UnknownKey { path });
    }

    if has_empty_entries(raw) {
        warnings.insert(0, CatalogWarning::EmptyEntries);
    }

    let result = if violations.is_empty() {
        Ok(Catalog::from_parts(sites, notifications))
    } else {
        Err(violations)
    };

    Validation { result, warnings }
}

/// Split ignored key paths into root-level keys, `(site index, key)` pairs,
/// and anything nested deeper.
fn classify_ignored(ignored: &[String]) -> (Vec<String>, Vec<(usize, String)>, Vec<String>) {
    let mut root = Vec::new();
    let mut site = Vec::new();
    let mut deep = Vec::new();

    for path in ignored {
        let segments: Vec<&str> = path.split('.').collect();
        match segments.as_slice() {
            [key] => root.push((*key).to_string()),
            [SITE_KEY, index, key] => match index.parse::<usize>() {
                Ok(index) => site.push((index, (*key).to_string())),
                Err(_) => deep.push(path.clone()),
            },
            _ => deep.push(path.clone()),
        }
    }

    (root, site, deep)
}

fn too_many_notifications(raw: &RawCatalog) -> bool {
    let count_of = |kind: &str| {
        raw.notification
            .iter()
            .filter(|n| n.kind.as_deref() == Some(kind))
            .count()
    };
    count_of("success") > 1 || count_of("failure") > 1 || raw.notification.len() > 2
}

fn site_label(site: &RawSite, index: usize) -> String {
    match non_empty(site.id.as_deref()) {
        Some(id) => id.to_string(),
        None => format!("#{}", index + 1),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Checks the source/destination pair, reporting at most one violation.
fn check_endpoints(site: &RawSite, label: &str) -> Result<(Endpoint, Endpoint), Violation> {
    let source = site.source.as_ref().and_then(OneOrMany::single);
    let destination = site.destination.as_ref().and_then(OneOrMany::single);

    let (Some(source), Some(destination)) = (source, destination) else {
        return Err(Violation::EndpointCount {
            site: label.to_string(),
        });
    };

    let (Some(source_path), Some(destination_path)) = (
        non_empty(source.path.as_deref()),
        non_empty(destination.path.as_deref()),
    ) else {
        return Err(Violation::IncompleteEndpoint {
            site: label.to_string(),
        });
    };

    let (Some(source_kind), Some(destination_kind)) =
        (source.kind.as_deref(), destination.kind.as_deref())
    else {
        return Err(Violation::MissingEndpointType {
            site: label.to_string(),
        });
    };

    let parse_kind = |kind: &str| {
        kind.parse::<EndpointKind>()
            .map_err(|_| Violation::UnknownEndpointType {
                site: label.to_string(),
                kind: kind.to_string(),
            })
    };
    let source_kind = parse_kind(source_kind)?;
    let destination_kind = parse_kind(destination_kind)?;

    Ok((
        build_endpoint(source, source_kind, source_path),
        build_endpoint(destination, destination_kind, destination_path),
    ))
}

fn build_endpoint(raw: &RawEndpoint, kind: EndpointKind, path: &str) -> Endpoint {
    Endpoint::new(kind, path)
        .with_preserve_dir(raw.preserve_dir)
        .with_snapshot(raw.snapshot)
}

fn build_flags(site: &RawSite) -> Vec<Flag> {
    site.flags
        .iter()
        .filter_map(|flag| {
            let name = non_empty(flag.name.as_deref())?;
            Some(Flag {
                name: name.to_string(),
                long: flag.long,
            })
        })
        .collect()
}

fn build_filters(site: &RawSite, label: &str, warnings: &mut Vec<CatalogWarning>) -> Vec<Filter> {
    let mut filters = Vec::new();
    for filter in &site.filters {
        let Some(pattern) = non_empty(filter.pattern.as_deref()) else {
            continue;
        };
        let kind = filter.kind.as_deref().unwrap_or_default();
        match kind.parse::<FilterKind>() {
            Ok(kind) => filters.push(Filter {
                kind,
                pattern: pattern.to_string(),
            }),
            Err(_) => warnings.push(CatalogWarning::UnknownFilterType {
                site: label.to_string(),
                kind: kind.to_string(),
            }),
        }
    }
    filters
}

fn build_notifications(raw: &RawCatalog, warnings: &mut Vec<CatalogWarning>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    for notification in &raw.notification {
        let kind = notification.kind.as_deref().unwrap_or_default();
        let outcome = match kind.parse::<Outcome>() {
            Ok(outcome) => outcome,
            Err(_) => {
                warnings.push(CatalogWarning::UnknownNotificationType {
                    kind: kind.to_string(),
                });
                continue;
            }
        };
        if let Some(command) = non_empty(notification.command.as_deref()) {
            notifications.push(Notification {
                outcome,
                command: command.to_string(),
            });
        }
    }
    notifications
}

/// True if any entity carries empty (or missing) text content.
fn has_empty_entries(raw: &RawCatalog) -> bool {
    let blank = |value: Option<&String>| value.map_or(true, |v| v.trim().is_empty());
    let blank_if_present = |value: Option<&String>| value.is_some_and(|v| v.trim().is_empty());

    let notification_blank = raw
        .notification
        .iter()
        .any(|n| blank(n.command.as_ref()) || blank_if_present(n.kind.as_ref()));

    let site_blank = raw.site.iter().any(|site| {
        let endpoint_blank = [&site.source, &site.destination]
            .into_iter()
            .flatten()
            .flat_map(OneOrMany::iter)
            .any(|endpoint| {
                blank(endpoint.path.as_ref()) || blank_if_present(endpoint.kind.as_ref())
            });

        blank_if_present(site.id.as_ref())
            || blank_if_present(site.name.as_ref())
            || endpoint_blank
            || site.params.values().any(|v| v.trim().is_empty())
            || site.flags.iter().any(|f| blank(f.name.as_ref()))
            || site.filters.iter().any(|f| blank(f.pattern.as_ref()))
    });

    notification_blank || site_blank
}
