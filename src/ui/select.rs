//! Interactive selection wrappers around inquire.

use inquire::{Confirm, Select};

use crate::agent::{self, Agent};
use crate::error::{Result, SpecifyError};

/// Arrow-key selection of an AI assistant.
pub fn select_agent() -> Result<&'static Agent> {
    let items: Vec<String> = agent::AGENTS
        .iter()
        .map(|a| format!("{} ({})", a.name, a.id))
        .collect();

    let selection = Select::new("Choose your AI assistant", items.clone())
        .with_starting_cursor(0)
        .with_page_size(10)
        .without_filtering()
        .with_help_message("↑↓ to move, ENTER to select, ESC to cancel")
        .prompt_skippable()?
        .ok_or(SpecifyError::Cancelled)?;

    let index = items
        .iter()
        .position(|i| *i == selection)
        .unwrap_or_default();
    Ok(&agent::AGENTS[index])
}

/// Arrow-key selection of a script type, cursor on the OS default.
pub fn select_script_type() -> Result<&'static str> {
    let default = agent::default_script_type();
    let items: Vec<String> = agent::SCRIPT_TYPES
        .iter()
        .map(|(key, label)| format!("{} ({})", label, key))
        .collect();
    let start = agent::SCRIPT_TYPES
        .iter()
        .position(|(key, _)| *key == default)
        .unwrap_or_default();

    let selection = Select::new("Choose your script type", items.clone())
        .with_starting_cursor(start)
        .without_filtering()
        .with_help_message("↑↓ to move, ENTER to select, ESC to cancel")
        .prompt_skippable()?
        .ok_or(SpecifyError::Cancelled)?;

    let index = items
        .iter()
        .position(|i| *i == selection)
        .unwrap_or_default();
    Ok(agent::SCRIPT_TYPES[index].0)
}

/// Confirm merging the template into a non-empty current directory.
pub fn confirm_merge_into_current_dir() -> Result<bool> {
    let confirmed = Confirm::new("Current directory is not empty. Merge the template into it?")
        .with_default(false)
        .prompt_skippable()?
        .unwrap_or(false);
    Ok(confirmed)
}
