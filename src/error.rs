//! Error types and handling for Specify
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Specify operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpecifyError {
    // Argument errors
    #[error("Unknown AI assistant: {name} (available: {available})")]
    #[diagnostic(
        code(specify::args::unknown_agent),
        help("Run 'specify init' without --ai to pick one interactively")
    )]
    UnknownAgent { name: String, available: String },

    #[error("Unknown script type: {name}")]
    #[diagnostic(
        code(specify::args::unknown_script_type),
        help("Valid script types: sh (POSIX shell), ps (PowerShell)")
    )]
    UnknownScriptType { name: String },

    #[error("Specify either a project name or --here, not both")]
    #[diagnostic(code(specify::args::name_conflicts_with_here))]
    NameConflictsWithHere,

    #[error("A project name is required unless --here is used")]
    #[diagnostic(
        code(specify::args::missing_project_name),
        help("Run 'specify init <name>' or 'specify init --here' for the current directory")
    )]
    MissingProjectName,

    #[error("Required tool '{tool}' for {agent} not found on PATH")]
    #[diagnostic(
        code(specify::args::agent_tool_missing),
        help("Install the tool or rerun with --ignore-agent-tools")
    )]
    AgentToolMissing { agent: String, tool: String },

    // Release metadata errors
    #[error("GitHub API returned {status} for {url}")]
    #[diagnostic(
        code(specify::fetch::metadata_failed),
        help("Check network connectivity; for rate limits set GH_TOKEN or GITHUB_TOKEN")
    )]
    MetadataFetchFailed {
        url: String,
        status: String,
        detail: String,
    },

    #[error("Failed to parse release metadata: {detail}")]
    #[diagnostic(code(specify::fetch::parse_failed))]
    ReleaseParseFailed { detail: String },

    #[error("No release asset matches pattern '{pattern}'\nAvailable assets:\n{available}")]
    #[diagnostic(
        code(specify::fetch::asset_not_found),
        help("Check the --ai and --script values against the assets listed above")
    )]
    AssetNotFound { pattern: String, available: String },

    // Download errors
    #[error("Template download failed: {detail}")]
    #[diagnostic(code(specify::download::failed))]
    DownloadFailed { detail: String },

    // Extraction errors
    #[error("Project directory already exists: {path}")]
    #[diagnostic(
        code(specify::extract::destination_exists),
        help("Choose another name, or use --here to merge into the current directory")
    )]
    ProjectDirExists { path: String },

    #[error("Template extraction failed: {message}")]
    #[diagnostic(code(specify::extract::failed))]
    ExtractionFailed { message: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(specify::git::operation_failed))]
    GitOperationFailed { message: String },

    // Interaction errors
    #[error("Operation cancelled")]
    #[diagnostic(code(specify::ui::cancelled))]
    Cancelled,

    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(specify::ui::prompt_failed),
        help("Interactive selection needs a terminal; pass --ai and --script explicitly")
    )]
    PromptFailed { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(specify::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SpecifyError {
    fn from(err: std::io::Error) -> Self {
        SpecifyError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SpecifyError {
    fn from(err: serde_json::Error) -> Self {
        SpecifyError::ReleaseParseFailed {
            detail: err.to_string(),
        }
    }
}

impl From<git2::Error> for SpecifyError {
    fn from(err: git2::Error) -> Self {
        SpecifyError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SpecifyError {
    fn from(err: reqwest::Error) -> Self {
        SpecifyError::DownloadFailed {
            detail: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for SpecifyError {
    fn from(err: zip::result::ZipError) -> Self {
        SpecifyError::ExtractionFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for SpecifyError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => SpecifyError::Cancelled,
            other => SpecifyError::PromptFailed {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SpecifyError>;
