use clap::Parser;

/// Arguments for the init command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   New project directory:\n    specify init my-project --ai claude\n\n\
                   Merge into the current directory:\n    specify init --here --ai copilot\n\n\
                   Skip tool checks and git init:\n    specify init my-project --ai claude --ignore-agent-tools --no-git")]
pub struct InitArgs {
    /// Name of the project directory to create
    pub project_name: Option<String>,

    /// AI assistant to use (e.g. claude, copilot, gemini)
    #[arg(long)]
    pub ai: Option<String>,

    /// Script type variant: sh (POSIX shell) or ps (PowerShell)
    #[arg(long)]
    pub script: Option<String>,

    /// Initialize in the current directory instead of creating a new one
    #[arg(long)]
    pub here: bool,

    /// Skip the confirmation prompt when the current directory is not empty
    #[arg(long)]
    pub force: bool,

    /// Skip git repository initialization
    #[arg(long)]
    pub no_git: bool,

    /// Skip checks for AI assistant CLI tools
    #[arg(long)]
    pub ignore_agent_tools: bool,

    /// Show verbose diagnostic output for network and extraction errors
    #[arg(long)]
    pub debug: bool,

    /// GitHub token for API requests (falls back to GH_TOKEN / GITHUB_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,
}
