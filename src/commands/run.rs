use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use ursync::compile::SystemClock;
use ursync::run::{
    rsync_available, Confirmer, FixedAnswer, PromptMode, RunEventSink, SystemExecutor,
};
use ursync::{RunOptions, Runner, UrsyncError};

use super::{require_sites, Session};
use crate::ui::events::{ConsoleEventSink, JsonEventSink};
use crate::ui::json::{emit, CompleteEvent, StartEvent};
use crate::ui::output::print_warning;
use crate::ui::prompt::DialoguerConfirmer;

static CANCEL: AtomicBool = AtomicBool::new(false);

pub struct RunArgs {
    pub sites: Vec<String>,
    pub dry_run: bool,
    pub prompt: u8,
    pub notify_each: bool,
    pub yes: bool,
}

pub fn cmd_run(session: &Session, args: RunArgs) -> Result<i32> {
    let ui = session.ui;
    let catalog = session.load_catalog()?;
    require_sites(&catalog, &args.sites)?;

    if !rsync_available() {
        return Err(UrsyncError::RsyncMissing.into());
    }

    if let Err(err) = ctrlc::set_handler(|| CANCEL.store(true, Ordering::SeqCst)) {
        tracing::warn!(%err, "could not install interrupt handler");
    }

    let mut prompt = PromptMode::from_count(args.prompt);
    let confirmer: Box<dyn Confirmer> = if args.yes || prompt == PromptMode::Never {
        Box::new(FixedAnswer(true))
    } else if ui.interactive() {
        Box::new(DialoguerConfirmer::new(ui.unicode))
    } else {
        print_warning(&ui, "no terminal to prompt on; skipping every site");
        prompt = PromptMode::Once;
        Box::new(FixedAnswer(false))
    };

    let events: Box<dyn RunEventSink> = if ui.json {
        let _ = emit(&StartEvent::new("run"));
        Box::new(JsonEventSink::new(std::io::stdout()))
    } else {
        Box::new(ConsoleEventSink::new(ui))
    };

    let prober = session.prober();
    let runner = Runner {
        catalog: &catalog,
        prober: &prober,
        clock: &SystemClock,
        executor: &SystemExecutor,
        confirmer: confirmer.as_ref(),
        events: events.as_ref(),
        cancel: &CANCEL,
    };

    let options = RunOptions {
        dry_run: args.dry_run,
        prompt,
        notify_each: args.notify_each || session.config.run.notify_each,
    };
    let summary = runner.run(&args.sites, options);
    let code = summary.exit_code();

    tracing::info!(
        sites = summary.sites.len(),
        failed = summary.any_failed(),
        cancelled = summary.cancelled,
        "run finished"
    );

    if ui.json {
        let _ = emit(&CompleteEvent::new("run", code));
    }
    Ok(code)
}
