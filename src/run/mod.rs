//! Orchestration
//!
//! Compiles every selected site up front, asks for confirmation according
//! to the prompt mode, then executes each plan in selection order. A failing
//! step aborts the rest of its site only. Notification scripts fire per
//! site (`--notify-each`) or once for the whole run.

mod confirm;
mod events;
mod executor;

use std::sync::atomic::{AtomicBool, Ordering};

pub use confirm::{Confirmer, FixedAnswer};
pub use events::{NoopEventSink, RunEvent, RunEventSink};
pub use executor::{rsync_available, Executor, InvocationFailure, SystemExecutor};

use crate::catalog::{Catalog, Outcome};
use crate::compile::{compile, Clock, CompileFailure, InvocationPlan};
use crate::notify::notification_command;
use crate::probe::Prober;

/// Exit status after an interrupt (128 + SIGINT).
pub const EXIT_CANCELLED: i32 = 130;

/// How often to ask before transferring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Never,
    /// One prompt for the whole batch
    Once,
    /// One prompt per site
    Each,
}

impl PromptMode {
    /// `-p` count: none, once, each.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => PromptMode::Never,
            1 => PromptMode::Once,
            _ => PromptMode::Each,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub prompt: PromptMode,
    pub notify_each: bool,
}

/// Final state of one selected site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteStatus {
    Succeeded,
    Skipped,
    CompileFailed(CompileFailure),
    Failed(InvocationFailure),
}

impl SiteStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, SiteStatus::CompileFailed(_) | SiteStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOutcome {
    pub id: String,
    pub status: SiteStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sites: Vec<SiteOutcome>,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn any_failed(&self) -> bool {
        self.sites.iter().any(|s| s.status.is_failure())
    }

    pub fn all_skipped(&self) -> bool {
        self.sites.iter().all(|s| s.status == SiteStatus::Skipped)
    }

    pub fn outcome(&self) -> Outcome {
        if self.any_failed() {
            Outcome::Failure
        } else {
            Outcome::Success
        }
    }

    /// 0 when every site succeeded, 130 after an interrupt, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.cancelled {
            EXIT_CANCELLED
        } else if self.any_failed() {
            1
        } else {
            0
        }
    }
}

/// Collaborators a run needs.
pub struct Runner<'a> {
    pub catalog: &'a Catalog,
    pub prober: &'a dyn Prober,
    pub clock: &'a dyn Clock,
    pub executor: &'a dyn Executor,
    pub confirmer: &'a dyn Confirmer,
    pub events: &'a dyn RunEventSink,
    pub cancel: &'a AtomicBool,
}

impl Runner<'_> {
    /// Run the selected sites. Site ids must already be known to the
    /// catalog; unknown ids compile to an unavailable failure.
    pub fn run(&self, site_ids: &[String], options: RunOptions) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut compiled: Vec<(&str, Result<InvocationPlan, CompileFailure>)> =
            Vec::with_capacity(site_ids.len());

        for id in site_ids {
            // probing can take a while per site; stop before the next one
            if self.cancelled() {
                summary.cancelled = true;
                self.events.on_event(&RunEvent::Cancelled);
                return summary;
            }
            let result = compile(self.catalog, id, options.dry_run, self.prober, self.clock);
            match &result {
                Ok(plan) => self.events.on_event(&RunEvent::Compiled {
                    site: id.clone(),
                    plan: plan.clone(),
                }),
                Err(failure) => self.events.on_event(&RunEvent::CompileFailed {
                    site: id.clone(),
                    error: failure.to_string(),
                }),
            }
            compiled.push((id.as_str(), result));
        }

        if options.prompt == PromptMode::Once {
            let has_errors = compiled.iter().any(|(_, r)| r.is_err());
            let prompt = batch_prompt(site_ids, has_errors);
            if !self.confirmer.confirm(&prompt) {
                self.events.on_event(&RunEvent::AllSkipped);
                summary.sites = site_ids
                    .iter()
                    .map(|id| SiteOutcome {
                        id: id.clone(),
                        status: SiteStatus::Skipped,
                    })
                    .collect();
                return summary;
            }
        }

        for (id, result) in compiled {
            if self.cancelled() {
                summary.cancelled = true;
                break;
            }

            if options.prompt == PromptMode::Each
                && !self.confirmer.confirm(&site_prompt(id, result.is_err()))
            {
                self.events.on_event(&RunEvent::SiteSkipped {
                    site: id.to_string(),
                });
                summary.sites.push(SiteOutcome {
                    id: id.to_string(),
                    status: SiteStatus::Skipped,
                });
                continue;
            }

            let status = match result {
                Ok(plan) => self.execute_plan(id, &plan),
                Err(failure) => SiteStatus::CompileFailed(failure),
            };
            // an interrupt also kills the running child, so look again
            summary.cancelled = self.cancelled();
            self.events.on_event(&RunEvent::SiteFinished {
                site: id.to_string(),
                success: !status.is_failure(),
            });

            if options.notify_each && !summary.cancelled {
                let outcome = if status.is_failure() {
                    Outcome::Failure
                } else {
                    Outcome::Success
                };
                self.notify(outcome, &[id]);
            }

            summary.sites.push(SiteOutcome {
                id: id.to_string(),
                status,
            });
            if summary.cancelled {
                break;
            }
        }

        if summary.cancelled {
            self.events.on_event(&RunEvent::Cancelled);
        } else if !options.notify_each && !summary.all_skipped() {
            let processed: Vec<&str> = summary
                .sites
                .iter()
                .filter(|s| s.status != SiteStatus::Skipped)
                .map(|s| s.id.as_str())
                .collect();
            self.notify(summary.outcome(), &processed);
        }

        summary
    }

    fn execute_plan(&self, site: &str, plan: &InvocationPlan) -> SiteStatus {
        for invocation in plan.invocations() {
            if self.cancelled() {
                return SiteStatus::Failed(InvocationFailure::Cancelled {
                    program: invocation.program.clone(),
                });
            }
            self.events.on_event(&RunEvent::InvocationStarted {
                site: site.to_string(),
                command: invocation.to_string(),
            });
            if let Err(failure) = self.executor.execute(invocation) {
                self.events.on_event(&RunEvent::InvocationFailed {
                    site: site.to_string(),
                    error: failure.to_string(),
                });
                return SiteStatus::Failed(failure);
            }
        }
        SiteStatus::Succeeded
    }

    fn notify(&self, outcome: Outcome, site_ids: &[&str]) {
        let Some(command) = notification_command(self.catalog, outcome, site_ids) else {
            self.events.on_event(&RunEvent::NotificationMissing { outcome });
            return;
        };
        let event = match self.executor.execute(&command) {
            Ok(()) => RunEvent::NotificationSent {
                outcome,
                sites: site_ids.iter().map(|s| s.to_string()).collect(),
            },
            Err(failure) => RunEvent::NotificationFailed {
                outcome,
                error: failure.to_string(),
            },
        };
        self.events.on_event(&event);
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

fn batch_prompt(site_ids: &[String], has_errors: bool) -> String {
    format!(
        "Run the rsync commands for sites {}{}?",
        site_ids.join(", "),
        if has_errors {
            " (WARNING: errors detected in one or more sites)"
        } else {
            ""
        }
    )
}

fn site_prompt(site_id: &str, has_error: bool) -> String {
    format!(
        "Run the rsync command for site {}{}?",
        site_id,
        if has_error {
            " (WARNING: error detected in site)"
        } else {
            ""
        }
    )
}
