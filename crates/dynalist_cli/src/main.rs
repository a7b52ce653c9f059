//! `dynalist` command-line front-end.
//!
//! # Responsibility
//! - Drive the core library over a document already saved to disk or piped in.
//! - Map failures to a message on stderr and exit code 1.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::{CommonArgs, Settings};
use std::collections::HashMap;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "dynalist")]
#[command(version)]
#[command(about = "Render and check Dynalist documents exported as JSON")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the document (or the zoomed subtree) to Markdown
    Markdown {
        /// Start node id; overrides the zoom target of --url
        #[arg(long)]
        node: Option<String>,
    },
    /// Report internal links pointing at nodes that do not exist
    Lint,
    /// List node ids and content
    Nodes {
        /// Traversal order: tree or api
        #[arg(long, default_value = "tree")]
        order: String,
    },
    /// List every link found in node content and notes
    Links,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let env = std::env::vars().collect::<HashMap<_, _>>();
    let settings = Settings::resolve(&cli.common, &env);

    if let Err(err) = dynalist_core::init_logging(settings.log_level, settings.log_dir.as_deref())
    {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Markdown { node } => commands::markdown(&settings, node.as_deref()),
        Command::Lint => commands::lint(&settings),
        Command::Nodes { order } => commands::nodes(&settings, order),
        Command::Links => commands::links(&settings),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            log::debug!("event=command_failed module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
