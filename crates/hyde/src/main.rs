//! Hyde CLI - Static site page pipeline.
//!
//! Provides commands for:
//! - `routes`: List the route table of a site
//! - `check`: Build every page and report all errors
//! - `nav`: Print the main menu and documentation sidebar

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, NavArgs, RoutesArgs};
use output::Output;

/// Hyde - Static site page pipeline.
#[derive(Parser)]
#[command(name = "hyde", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every route of the site.
    Routes(RoutesArgs),
    /// Build every page and report all errors.
    Check(CheckArgs),
    /// Print navigation trees as JSON.
    Nav(NavArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Routes(args) => args.site.verbose,
            Self::Check(args) => args.site.verbose,
            Self::Nav(args) => args.site.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Routes(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
