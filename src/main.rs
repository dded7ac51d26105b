//! A slim binary for pushing a message to a Mattermost channel or user.
//!
//! The server's location and the bot's credentials come from a config file
//! (see [config]), whilst the message itself is read from stdin:
//!
//! ```sh
//! uptime | mmmsg --channel ops --codeblock
//! mmmsg --channel @alice --attachment report.pdf <<< "Here's the report"
//! ```

use clap::Parser;
use dotenvy::dotenv;
use error::Failure;
use run::{run, Invocation};
use std::{io, path::PathBuf, process};
use tracing::debug;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

mod config;
mod de;
mod error;
mod mattermost;
mod message;
mod run;
mod target;

/// Shown after the flags in `--help`.
const CONFIG_HELP: &str = r#"The config file is JSON:

{
    "mattermost_api": "<mattermost url WITHOUT /api/v4>",
    "mattermost_user": "<username or email address>",
    "mattermost_password": "<password>",
    "mattermost_team": "<team name>",
    "default_channel": "<default channel if not provided>"
}"#;

/// Post a message read from stdin to a Mattermost channel or user.
#[derive(Parser, Debug)]
#[command(name = "mmmsg")]
#[command(about = "Posts a message read from stdin to a Mattermost channel or user")]
#[command(after_help = CONFIG_HELP)]
struct Args {
    /// Path to a config file [default: ~/.config/mmmsg.json].
    #[arg(long, env = "MMMSG_CONFIG")]
    config: Option<PathBuf>,

    /// Print the version string.
    #[arg(long)]
    version: bool,

    /// Surround the input with code block backticks.
    #[arg(long)]
    codeblock: bool,

    /// Channel to post in, or @username to send a direct message. Defaults
    /// to the config's `default_channel`.
    #[arg(long)]
    channel: Option<String>,

    /// Upload and attach this file.
    #[arg(long)]
    attachment: Option<PathBuf>,
}

/// Application entrypoint. Initialises tracing, parses arguments, and runs to
/// completion, exiting non-zero with a single line on stderr upon failure.
///
/// Progress logs go to stdout, leaving stderr to the error alone.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    if dotenv().is_err() {
        debug!("No .env found");
    }

    let args = Args::parse();

    if args.version {
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = start(args).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

async fn start(args: Args) -> Result<(), Failure> {
    let config_path = match args.config {
        Some(p) => p,
        None => config::default_path()?,
    };

    let inv = Invocation {
        config_path,
        channel: args.channel,
        code_block: args.codeblock,
        attachment: args.attachment,
    };

    run(inv, io::stdin()).await
}
