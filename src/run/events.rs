//! Run event port
//!
//! The runner reports progress through a sink so the terminal renderer, the
//! `--json` NDJSON stream and tests can observe the same run.

use serde::Serialize;

use crate::catalog::Outcome;
use crate::compile::InvocationPlan;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Compiled { site: String, plan: InvocationPlan },
    CompileFailed { site: String, error: String },
    /// The batch prompt was declined
    AllSkipped,
    SiteSkipped { site: String },
    InvocationStarted { site: String, command: String },
    InvocationFailed { site: String, error: String },
    SiteFinished { site: String, success: bool },
    NotificationSent {
        #[serde(serialize_with = "outcome_name")]
        outcome: Outcome,
        sites: Vec<String>,
    },
    NotificationMissing {
        #[serde(serialize_with = "outcome_name")]
        outcome: Outcome,
    },
    NotificationFailed {
        #[serde(serialize_with = "outcome_name")]
        outcome: Outcome,
        error: String,
    },
    Cancelled,
}

fn outcome_name<S: serde::Serializer>(outcome: &Outcome, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(outcome.as_str())
}

pub trait RunEventSink {
    fn on_event(&self, event: &RunEvent);
}

/// Discards every event.
pub struct NoopEventSink;

impl RunEventSink for NoopEventSink {
    fn on_event(&self, _event: &RunEvent) {}
}
