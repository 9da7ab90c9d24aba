//! Run event sinks: terminal lines on stderr, or NDJSON on stdout.

use std::cell::RefCell;
use std::io::Write;

use ursync::run::{RunEvent, RunEventSink};

use crate::ui::context::UiContext;
use crate::ui::icon::Icon;
use crate::ui::json::write_event;
use crate::ui::output::paint;
use crate::ui::theme::colors;

pub struct ConsoleEventSink {
    ui: UiContext,
}

impl ConsoleEventSink {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

impl RunEventSink for ConsoleEventSink {
    fn on_event(&self, event: &RunEvent) {
        if let Some(text) = render_event(event, &self.ui) {
            eprintln!("{}", text);
        }
    }
}

/// One terminal line per event, or `None` when the verbosity hides it.
pub fn render_event(event: &RunEvent, ui: &UiContext) -> Option<String> {
    let v = ui.verbosity;
    let icon = |i: Icon| i.colored(ui.color, ui.unicode);

    match event {
        RunEvent::Compiled { site, plan } => v.shows_commands().then(|| {
            let mut text = format!("{} {}: {}", icon(Icon::Command), site, plan.primary);
            for step in &plan.post {
                text.push_str(&format!(
                    "\n  {} {}",
                    icon(Icon::Arrow),
                    paint(&step.to_string(), colors::DIM, ui.color)
                ));
            }
            text
        }),
        RunEvent::CompileFailed { error, .. } => v
            .shows_errors()
            .then(|| format!("{} {}", icon(Icon::Error), paint(error, colors::ERROR, ui.color))),
        RunEvent::AllSkipped => v
            .shows_errors()
            .then(|| format!("{} Skipping all commands...", icon(Icon::Skipped))),
        RunEvent::SiteSkipped { site } => v
            .shows_errors()
            .then(|| format!("{} Skipping site {}...", icon(Icon::Skipped), site)),
        RunEvent::InvocationStarted { site, command } => v.shows_warnings().then(|| {
            format!(
                "{} {} {}",
                icon(Icon::Progress),
                site,
                paint(command, colors::DIM, ui.color)
            )
        }),
        RunEvent::InvocationFailed { site, error } => v.shows_errors().then(|| {
            format!(
                "{} {}: {}",
                icon(Icon::Error),
                site,
                paint(error, colors::ERROR, ui.color)
            )
        }),
        RunEvent::SiteFinished { site, success } => v.shows_warnings().then(|| {
            if *success {
                format!("{} {} done", icon(Icon::Success), site)
            } else {
                format!("{} {} failed", icon(Icon::Error), site)
            }
        }),
        RunEvent::NotificationSent { outcome, sites } => v.shows_commands().then(|| {
            format!(
                "{} {} notification sent for {}",
                icon(Icon::Arrow),
                outcome.as_str(),
                sites.join(", ")
            )
        }),
        RunEvent::NotificationMissing { outcome } => v.shows_warnings().then(|| {
            format!(
                "{} {}",
                icon(Icon::Warning),
                paint(
                    &format!("No {} notification script found. Skipping...", outcome.as_str()),
                    colors::WARNING,
                    ui.color
                )
            )
        }),
        RunEvent::NotificationFailed { outcome, error } => v.shows_warnings().then(|| {
            format!(
                "{} {}",
                icon(Icon::Warning),
                paint(
                    &format!("{} notification failed: {}", outcome.as_str(), error),
                    colors::WARNING,
                    ui.color
                )
            )
        }),
        RunEvent::Cancelled => Some(format!(
            "{} Interrupted; remaining sites were not run",
            icon(Icon::Error)
        )),
    }
}

/// Streams every event as one JSON object per line.
pub struct JsonEventSink<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> JsonEventSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> RunEventSink for JsonEventSink<W> {
    fn on_event(&self, event: &RunEvent) {
        let mut out = self.out.borrow_mut();
        if let Err(err) = write_event(&mut *out, event) {
            tracing::warn!(%err, "failed to write json event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ursync::catalog::Outcome;
    use ursync::config::Verbosity;
    use ursync::{Invocation, InvocationPlan};

    use crate::ui::terminal::TerminalCapabilities;

    fn ui(verbosity: Verbosity) -> UiContext {
        UiContext {
            json: false,
            verbosity,
            caps: TerminalCapabilities {
                stdin_tty: false,
                supports_color: false,
                supports_unicode: false,
                is_ci: false,
            },
            color: false,
            unicode: false,
        }
    }

    fn compiled() -> RunEvent {
        RunEvent::Compiled {
            site: "docs".to_string(),
            plan: InvocationPlan {
                primary: Invocation::new("rsync").args(["-a", "/src/", "/dst"]),
                post: vec![Invocation::new("rm").args(["-f", "/dst/last"])],
            },
        }
    }

    #[test]
    fn compiled_plan_only_shown_when_verbose() {
        assert_eq!(render_event(&compiled(), &ui(Verbosity::Normal)), None);
        assert_eq!(
            render_event(&compiled(), &ui(Verbosity::Verbose)).as_deref(),
            Some("$ docs: rsync -a /src/ /dst\n  -> rm -f /dst/last")
        );
    }

    #[test]
    fn quiet_hides_warnings_but_keeps_errors() {
        let quiet = ui(Verbosity::Quiet);
        let missing = RunEvent::NotificationMissing {
            outcome: Outcome::Success,
        };
        assert_eq!(render_event(&missing, &quiet), None);

        let failed = RunEvent::InvocationFailed {
            site: "docs".to_string(),
            error: "rsync exited with status 23".to_string(),
        };
        assert_eq!(
            render_event(&failed, &quiet).as_deref(),
            Some("[FAIL] docs: rsync exited with status 23")
        );
    }

    #[test]
    fn silent_still_reports_cancellation() {
        let silent = ui(Verbosity::Silent);
        assert_eq!(render_event(&RunEvent::AllSkipped, &silent), None);
        assert!(render_event(&RunEvent::Cancelled, &silent).is_some());
    }

    #[test]
    fn missing_notification_wording() {
        let text = render_event(
            &RunEvent::NotificationMissing {
                outcome: Outcome::Failure,
            },
            &ui(Verbosity::Normal),
        );
        assert_eq!(
            text.as_deref(),
            Some("[WARN] No failure notification script found. Skipping...")
        );
    }

    #[test]
    fn json_sink_writes_ndjson() {
        let sink = JsonEventSink::new(Vec::new());
        sink.on_event(&RunEvent::SiteSkipped {
            site: "docs".to_string(),
        });
        sink.on_event(&RunEvent::Cancelled);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                r#"{"event":"site_skipped","site":"docs"}"#,
                r#"{"event":"cancelled"}"#
            ]
        );
    }
}
