//! Specify - Spec-Driven Development project bootstrapper
//!
//! Materializes a versioned spec-kit template archive for a chosen AI
//! assistant and script type into a target directory, with local-cache-first
//! resolution, GitHub release fallback, and provenance-aware cleanup.

use clap::Parser;

mod agent;
mod cli;
mod commands;
mod error;
mod git;
mod merge;
mod temp;
mod template;
mod tracker;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(cli.verbose, args),
        Commands::Check => commands::check::run(),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
