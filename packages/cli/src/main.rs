mod commands;
mod config;
mod loader;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, init, inspect, path, validate, ApplyArgs, InitArgs, InspectArgs, PathArgs, ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagesmith CLI - inspect and edit page-builder documents
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine activity (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and a sample page
    Init(InitArgs),

    /// Print a page's outline and resolved styles
    Inspect(InspectArgs),

    /// Replay a list of operations against a page
    Apply(ApplyArgs),

    /// Check a page against the tree and nesting rules
    Validate(ValidateArgs),

    /// Print the path from the root to a node
    Path(PathArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Path(args) => path(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
