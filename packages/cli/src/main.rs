mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, init, inspect, ApplyArgs, InitArgs, InspectArgs};
use tracing_subscriber::EnvFilter;

/// Pagewright CLI - create, inspect and edit layout documents
#[derive(Parser, Debug)]
#[command(name = "pagewright")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every store operation (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blank document and a default config
    Init(InitArgs),

    /// Print the page and region trees of a document
    Inspect(InspectArgs),

    /// Replay an edit script against a document
    Apply(ApplyArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Inspect(args) => inspect(args, &cwd),
            Command::Apply(args) => apply(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
