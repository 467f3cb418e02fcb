//! Check command implementation: tool-presence report.

use console::Style;

use crate::agent;
use crate::error::Result;
use crate::ui;

/// Run the check command
pub fn run() -> Result<()> {
    ui::banner::show_banner();
    println!("Checking for installed tools...");
    println!();

    report("git", "git version control", agent::tool_on_path("git"));
    for a in agent::AGENTS {
        match a.cli_tool {
            Some(tool) => report(tool, a.name, agent::tool_on_path(tool)),
            None => println!(
                "{} {} {}",
                Style::new().dim().apply_to("○"),
                a.name,
                Style::new().dim().apply_to("(no CLI tool required)")
            ),
        }
    }

    println!();
    println!("specify is ready to use.");
    Ok(())
}

fn report(tool: &str, label: &str, found: bool) {
    if found {
        println!(
            "{} {} {}",
            Style::new().green().apply_to("✓"),
            label,
            Style::new().dim().apply_to(format!("({})", tool))
        );
    } else {
        println!(
            "{} {} {}",
            Style::new().red().apply_to("✗"),
            label,
            Style::new().dim().apply_to(format!("({} not found)", tool))
        );
    }
}
