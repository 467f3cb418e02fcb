//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - init: Init command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod init;

pub use completions::CompletionsArgs;
pub use init::InitArgs;

/// Specify - Spec-Driven Development project bootstrapper
#[derive(Parser, Debug)]
#[command(
    name = "specify",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Bootstrap Spec-Driven Development projects from spec-kit templates",
    long_about = "Specify materializes a versioned spec-kit template for your AI assistant \
                  into a new project directory (or the current one), initializes git, and \
                  reports next steps.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  specify init my-project                \x1b[90m# Pick assistant interactively\x1b[0m\n   \
                  specify init my-project --ai claude    \x1b[90m# Claude Code templates\x1b[0m\n   \
                  specify init --here --ai copilot       \x1b[90m# Merge into current directory\x1b[0m\n   \
                  specify check                          \x1b[90m# Check required tools\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new Specify project from the latest template
    Init(InitArgs),

    /// Check for installed AI assistant tools
    Check,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
