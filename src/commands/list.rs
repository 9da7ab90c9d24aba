use anyhow::Result;
use ursync::{is_available, Catalog, Endpoint, EndpointKind, Prober, Site};

use super::Session;
use crate::ui::json::emit;
use crate::ui::table::render_site_table;

pub fn cmd_list(
    session: &Session,
    all: bool,
    source: &[EndpointKind],
    destination: &[EndpointKind],
) -> Result<i32> {
    let catalog = session.load_catalog()?;
    let prober = session.prober();
    let sites = select_sites(&catalog, all, source, destination, &prober);

    if session.ui.json {
        for site in &sites {
            let _ = emit(&serde_json::json!({
                "event": "site",
                "id": site.id,
                "name": site.name,
                "source": endpoint_json(&site.source),
                "destination": endpoint_json(&site.destination),
            }));
        }
    } else {
        print!("{}", render_site_table(&sites, all));
    }
    Ok(0)
}

/// Type filters first (cheap), then the availability probes.
pub fn select_sites<'c>(
    catalog: &'c Catalog,
    all: bool,
    source: &[EndpointKind],
    destination: &[EndpointKind],
    prober: &dyn Prober,
) -> Vec<&'c Site> {
    catalog
        .sites()
        .iter()
        .filter(|site| source.is_empty() || source.contains(&site.source.kind()))
        .filter(|site| destination.is_empty() || destination.contains(&site.destination.kind()))
        .filter(|site| all || is_available(catalog, &site.id, prober))
        .collect()
}

fn endpoint_json(endpoint: &Endpoint) -> serde_json::Value {
    serde_json::json!({
        "type": endpoint.kind(),
        "path": endpoint.path_spec(),
    })
}

pub fn cmd_types(json: bool) -> Result<i32> {
    if json {
        let _ = emit(&serde_json::json!({
            "event": "types",
            "types": EndpointKind::ALL,
        }));
    } else {
        println!("{}", types_line());
    }
    Ok(0)
}

fn types_line() -> String {
    let names: Vec<&str> = EndpointKind::ALL.iter().map(EndpointKind::as_str).collect();
    format!(
        "Currently implemented types of transfer sites are: {}",
        names.join(", ")
    )
}
