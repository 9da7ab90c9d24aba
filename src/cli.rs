use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ursync::EndpointKind;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// ursync - run rsync transfers from a catalog of named sites
#[derive(Parser, Debug)]
#[command(name = "ursync")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit NDJSON events instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// More output (-v shows compiled commands, -vv debug logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less output (-q errors only, -qq critical errors only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Site catalog to use instead of the configured one
    #[arg(short, long = "input-file", global = true, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transfer the selected sites in order
    Run {
        /// Site ids to process
        #[arg(required = true, value_name = "SITE")]
        sites: Vec<String>,

        /// Turn every transfer into an rsync dry run
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Ask before transferring (-p once for the batch, -pp for each site)
        #[arg(short, long, action = clap::ArgAction::Count)]
        prompt: u8,

        /// Run the notification script after each site instead of once at the end
        #[arg(long)]
        notify_each: bool,

        /// Answer yes to every prompt
        #[arg(short, long, conflicts_with = "prompt")]
        yes: bool,
    },

    /// List available sites (or every configured site with --all)
    List {
        /// Include sites whose endpoints are currently unreachable
        #[arg(short, long)]
        all: bool,

        /// Only sites whose source is one of these types
        #[arg(long, num_args = 1.., value_name = "TYPE")]
        source: Vec<EndpointKind>,

        /// Only sites whose destination is one of these types
        #[arg(long, num_args = 1.., value_name = "TYPE")]
        destination: Vec<EndpointKind>,
    },

    /// List the known endpoint types
    Types,

    /// Validate the site catalog
    Check,

    /// Print the compiled commands for a site without running them
    Show {
        /// Site id
        site: String,

        /// Compile as a dry run
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}
