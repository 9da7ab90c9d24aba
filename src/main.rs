//! ursync CLI - run rsync transfers from a catalog of named sites
//!
//! Usage: ursync <COMMAND>
//!
//! Commands:
//!   run    Transfer the selected sites in order
//!   list   List available (or all) sites
//!   types  List the known endpoint types
//!   check  Validate the site catalog
//!   show   Print the compiled commands for a site

use std::process::ExitCode;

use clap::Parser;
use ursync::config::Config;
use ursync::Verbosity;

mod cli;
mod commands;
mod logging;
mod ui;

use cli::{Cli, Commands};
use commands::run::RunArgs;
use commands::{Reported, Session};
use ui::context::UiContext;
use ui::output::print_fatal;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err((err, json)) => {
            report(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<i32, (anyhow::Error, bool)> {
    let json = cli.json;

    // `types` needs neither config nor catalog
    if let Commands::Types = cli.command {
        logging::init(Verbosity::from_flags(cli.quiet, cli.verbose, Verbosity::Normal));
        return commands::list::cmd_types(json).map_err(|e| (e, json));
    }

    let session = match Session::new(&cli) {
        Ok(session) => session,
        Err(err) => {
            logging::init(Verbosity::from_flags(cli.quiet, cli.verbose, Verbosity::Normal));
            return Err((err, json));
        }
    };
    // the filter follows the configured verbosity, not just the flags
    logging::init(session.ui.verbosity);

    let result = match cli.command {
        Commands::Run {
            sites,
            dry_run,
            prompt,
            notify_each,
            yes,
        } => commands::run::cmd_run(
            &session,
            RunArgs {
                sites,
                dry_run,
                prompt,
                notify_each,
                yes,
            },
        ),
        Commands::List {
            all,
            source,
            destination,
        } => commands::list::cmd_list(&session, all, &source, &destination),
        Commands::Check => commands::check::cmd_check(&session),
        Commands::Show { site, dry_run } => commands::show::cmd_show(&session, &site, dry_run),
        Commands::Types => commands::list::cmd_types(json),
    };
    result.map_err(|e| (e, json))
}

fn report(err: &anyhow::Error, json: bool) {
    if err.downcast_ref::<Reported>().is_some() {
        return;
    }
    tracing::debug!(error = ?err, "command failed");

    if json {
        let _ = ui::json::emit(&serde_json::json!({
            "event": "error",
            "message": format!("{:#}", err),
        }));
    } else {
        let ui = UiContext::new(false, Verbosity::Normal, None, &Config::default());
        print_fatal(&ui, &format!("{:#}", err));
    }
}
