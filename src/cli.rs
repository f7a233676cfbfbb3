//! Command-line interface for autohelp.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::HelpConfig;
use crate::engine::{AutoHelp, InboundMessage};
use crate::extract::HttpPasteFetcher;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Snippet analysis and auto-fix for common Discord-framework mistakes.
///
/// Autohelp takes a chat message body, extracts the Python code in it,
/// runs a fixed pipeline of mistake detectors, and prints the findings
/// together with a mechanically fixed version of the snippet.
#[derive(Parser)]
#[command(name = "autohelp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one message body
    Check(CheckArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to a file holding the message body, or "-" for stdin
    pub input: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to a config YAML file (built-in defaults otherwise)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Guild id, used to pick per-guild doc links
    #[arg(short, long)]
    pub guild: Option<u64>,

    /// Do not resolve links to paste services
    #[arg(long)]
    pub no_fetch: bool,
}

/// Run the check command.
pub async fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match &args.config {
        Some(path) => match HelpConfig::parse_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => HelpConfig::default(),
    };

    let engine = if args.no_fetch {
        AutoHelp::new(config)
    } else {
        AutoHelp::with_fetcher(config, Arc::new(HttpPasteFetcher::default()))
    };

    let content = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.input)?
    };

    // The CLI analyzes one message in a fresh engine, so the cool-down
    // never bites; author and channel ids are placeholders.
    let mut message = InboundMessage::new(content, 0, 0);
    message.guild_id = args.guild;

    match engine.analyze(&message).await {
        Some(result) => {
            match args.format.as_str() {
                "json" => report::write_json(&result)?,
                _ => report::write_pretty(&result),
            }
            Ok(EXIT_FINDINGS)
        }
        None => {
            if args.format == "json" {
                println!("null");
            } else {
                println!("No findings.");
            }
            Ok(EXIT_SUCCESS)
        }
    }
}
