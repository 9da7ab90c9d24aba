use anyhow::Result;
use ursync::compile::SystemClock;
use ursync::{compile, InvocationPlan};

use super::{require_sites, Session};
use crate::ui::json::emit;
use crate::ui::output::print_error;

/// Compile one site and print its commands, one per line, in run order.
pub fn cmd_show(session: &Session, site: &str, dry_run: bool) -> Result<i32> {
    let catalog = session.load_catalog()?;
    require_sites(&catalog, [site])?;

    let prober = session.prober();
    match compile(&catalog, site, dry_run, &prober, &SystemClock) {
        Ok(plan) => {
            if session.ui.json {
                let _ = emit(&serde_json::json!({
                    "event": "plan",
                    "site": site,
                    "plan": plan,
                }));
            } else {
                print!("{}", render_plan(&plan));
            }
            Ok(0)
        }
        Err(failure) => {
            if session.ui.json {
                let _ = emit(&serde_json::json!({
                    "event": "compile_failed",
                    "site": site,
                    "error": failure.to_string(),
                }));
            } else {
                print_error(&session.ui, &failure.to_string());
            }
            Ok(1)
        }
    }
}

fn render_plan(plan: &InvocationPlan) -> String {
    plan.invocations().map(|i| format!("{}\n", i)).collect()
}
