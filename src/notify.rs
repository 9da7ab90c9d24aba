//! Notification scripts
//!
//! A catalog may carry one script per outcome. Every `%ID` in the script is
//! replaced with the processed site ids joined by `", "`, and the result is
//! handed to `sh -c`.

use crate::catalog::{Catalog, Outcome};
use crate::compile::Invocation;

pub const PLACEHOLDER: &str = "%ID";
pub const SHELL: &str = "sh";

/// Substitute `%ID` in a script template.
pub fn render(template: &str, site_ids: &[&str]) -> String {
    template.replace(PLACEHOLDER, &site_ids.join(", "))
}

/// The shell invocation for `outcome`, or `None` when the catalog has no
/// script for it.
pub fn notification_command(
    catalog: &Catalog,
    outcome: Outcome,
    site_ids: &[&str],
) -> Option<Invocation> {
    let script = catalog.notification(outcome)?;
    Some(Invocation::new(SHELL).args(["-c".to_string(), render(&script.command, site_ids)]))
}
