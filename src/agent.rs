//! Supported AI assistants and script types.
//!
//! Static registry driving variant selection, asset naming, and the
//! tool-presence checks used by `specify check` and `specify init`.

use std::path::Path;

use crate::error::{Result, SpecifyError};

/// One supported AI assistant.
#[derive(Debug)]
pub struct Agent {
    /// Identifier used in template archive names.
    pub id: &'static str,
    /// Human-readable display name.
    pub name: &'static str,
    /// CLI tool required on PATH, when the assistant ships one.
    pub cli_tool: Option<&'static str>,
    /// Directory the template drops assistant context into.
    pub context_dir: &'static str,
}

/// All supported assistants, in menu order.
pub const AGENTS: &[Agent] = &[
    Agent {
        id: "copilot",
        name: "GitHub Copilot",
        cli_tool: None,
        context_dir: ".github/",
    },
    Agent {
        id: "claude",
        name: "Claude Code",
        cli_tool: Some("claude"),
        context_dir: ".claude/",
    },
    Agent {
        id: "gemini",
        name: "Gemini CLI",
        cli_tool: Some("gemini"),
        context_dir: ".gemini/",
    },
    Agent {
        id: "cursor",
        name: "Cursor",
        cli_tool: Some("cursor-agent"),
        context_dir: ".cursor/",
    },
    Agent {
        id: "qwen",
        name: "Qwen Code",
        cli_tool: Some("qwen"),
        context_dir: ".qwen/",
    },
    Agent {
        id: "opencode",
        name: "opencode",
        cli_tool: Some("opencode"),
        context_dir: ".opencode/",
    },
    Agent {
        id: "windsurf",
        name: "Windsurf",
        cli_tool: None,
        context_dir: ".windsurf/",
    },
];

/// Script type variants shipped by the templates.
pub const SCRIPT_TYPES: &[(&str, &str)] = &[
    ("sh", "POSIX Shell (bash/zsh)"),
    ("ps", "PowerShell"),
];

/// OS-dependent default script type.
pub fn default_script_type() -> &'static str {
    if cfg!(windows) { "ps" } else { "sh" }
}

/// Look up an assistant by identifier.
pub fn find_agent(id: &str) -> Result<&'static Agent> {
    AGENTS
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| SpecifyError::UnknownAgent {
            name: id.to_string(),
            available: AGENTS
                .iter()
                .map(|a| a.id)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Validate a script type identifier.
pub fn validate_script_type(id: &str) -> Result<&'static str> {
    SCRIPT_TYPES
        .iter()
        .map(|(key, _)| *key)
        .find(|key| *key == id)
        .ok_or_else(|| SpecifyError::UnknownScriptType {
            name: id.to_string(),
        })
}

/// Check whether `tool` resolves to an executable on PATH.
pub fn tool_on_path(tool: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| candidate_names(tool).iter().any(|n| dir.join(n).is_file()))
}

#[cfg(windows)]
fn candidate_names(tool: &str) -> Vec<String> {
    ["exe", "cmd", "bat"]
        .iter()
        .map(|ext| format!("{}.{}", tool, ext))
        .chain(std::iter::once(tool.to_string()))
        .collect()
}

#[cfg(not(windows))]
fn candidate_names(tool: &str) -> Vec<String> {
    vec![tool.to_string()]
}

/// True when `path` exists and is executable-ish for our purposes.
#[allow(dead_code)]
pub fn context_dir_exists(project: &Path, agent: &Agent) -> bool {
    project.join(agent.context_dir.trim_end_matches('/')).is_dir()
}
