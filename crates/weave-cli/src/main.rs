//! Weave CLI
//!
//! Command-line interface for planning and checking assembly manifests

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "weave")]
#[command(about = "Weave - Component composition planner", long_about = None)]
struct Cli {
    /// Emit debug logs to stderr (RUST_LOG overrides the filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a manifest and print the ordered plan
    Plan(commands::plan::PlanArgs),
    /// Resolve a manifest and report only success or the first error
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        weave_core::logging_facility::init(weave_core::logging_facility::Profile::Development);
    }

    let result = match cli.command {
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
