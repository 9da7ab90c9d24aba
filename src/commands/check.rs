use anyhow::Result;

use super::Session;
use crate::ui::icon::Icon;
use crate::ui::json::emit;

/// Load and validate the catalog without probing or running anything.
pub fn cmd_check(session: &Session) -> Result<i32> {
    let catalog = session.load_catalog()?;
    let ui = session.ui;
    let count = catalog.sites().len();

    if ui.json {
        let _ = emit(&serde_json::json!({
            "event": "check",
            "file": session.catalog_path.display().to_string(),
            "valid": true,
            "sites": count,
        }));
    } else if ui.verbosity.shows_errors() {
        println!(
            "{} {} is valid ({} site{})",
            Icon::Success.colored(ui.color, ui.unicode),
            session.catalog_path.display(),
            count,
            if count == 1 { "" } else { "s" }
        );
    }
    Ok(0)
}
