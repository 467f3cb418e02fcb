//! Init command implementation.
//!
//! Banner, argument validation and variant selection, tool checks, then the
//! template pipeline (resolve, download if needed, extract, cleanup),
//! optional git initialization, and a next-steps summary.

use std::fs;
use std::path::PathBuf;

use console::Style;

use crate::agent::{self, Agent};
use crate::cli::InitArgs;
use crate::error::{Result, SpecifyError};
use crate::git;
use crate::merge::DeepMerger;
use crate::template::{self, MaterializationTarget, ResolvedTemplate, TemplateOrigin};
use crate::template::github::ReleaseClient;
use crate::tracker::{ConsoleReporter, Reporter, StepTracker};
use crate::ui;

/// Run the init command
pub fn run(verbose: bool, args: InitArgs) -> Result<()> {
    ui::banner::show_banner();

    let (project_path, project_name, merge_into_existing) = resolve_target(&args)?;

    let agent = match args.ai.as_deref() {
        Some(id) => agent::find_agent(id)?,
        None => ui::select::select_agent()?,
    };
    if !args.ignore_agent_tools {
        if let Some(tool) = agent.cli_tool {
            if !agent::tool_on_path(tool) {
                return Err(SpecifyError::AgentToolMissing {
                    agent: agent.name.to_string(),
                    tool: tool.to_string(),
                });
            }
        }
    }
    let script_type = match args.script.as_deref() {
        Some(s) => agent::validate_script_type(s)?,
        None if console::user_attended() => ui::select::select_script_type()?,
        None => agent::default_script_type(),
    };

    let reporter: Box<dyn Reporter> = if verbose || args.debug {
        Box::new(ConsoleReporter)
    } else {
        Box::new(StepTracker::new(&format!(
            "Initialize Specify Project: {}",
            project_name
        )))
    };

    let client = ReleaseClient::new(args.github_token.as_deref())?;
    let target = MaterializationTarget {
        destination: project_path.clone(),
        merge_into_existing,
    };
    let download_dir = std::env::current_dir()?;
    let resolved = template::fetch_and_materialize(
        agent.id,
        script_type,
        &target,
        &download_dir,
        &client,
        Some(&DeepMerger),
        reporter.as_ref(),
    )?;

    init_git(&project_path, &args, reporter.as_ref());
    drop(reporter);

    print_next_steps(&project_name, agent, merge_into_existing, &resolved);
    Ok(())
}

/// Work out where to materialize: a brand-new directory named after the
/// project, or the current directory in merge mode.
fn resolve_target(args: &InitArgs) -> Result<(PathBuf, String, bool)> {
    if args.here && args.project_name.is_some() {
        return Err(SpecifyError::NameConflictsWithHere);
    }

    if args.here {
        let cwd = std::env::current_dir()?;
        let name = cwd
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project")
            .to_string();
        let non_empty = fs::read_dir(&cwd)?.next().is_some();
        if non_empty && !args.force && !ui::select::confirm_merge_into_current_dir()? {
            return Err(SpecifyError::Cancelled);
        }
        return Ok((cwd, name, true));
    }

    let name = args
        .project_name
        .clone()
        .ok_or(SpecifyError::MissingProjectName)?;
    let path = std::env::current_dir()?.join(&name);
    if path.exists() {
        return Err(SpecifyError::ProjectDirExists {
            path: path.display().to_string(),
        });
    }
    Ok((path, name, false))
}

/// Initialize a git repository unless skipped or already inside one.
/// Failures are reported as step errors but do not abort the run; the
/// project tree is already materialized.
fn init_git(project_path: &std::path::Path, args: &InitArgs, reporter: &dyn Reporter) {
    reporter.add("git", "Initialize git repository");
    if args.no_git {
        reporter.skip("git", "--no-git");
        return;
    }
    if git::is_git_repo(project_path) {
        reporter.skip("git", "existing repository detected");
        return;
    }
    reporter.start("git", None);
    match git::init_git_repo(project_path) {
        Ok(()) => reporter.complete("git", Some("initial commit created")),
        Err(e) => reporter.error("git", &e.to_string()),
    }
}

fn print_next_steps(
    project_name: &str,
    agent: &Agent,
    merge_into_existing: bool,
    resolved: &ResolvedTemplate,
) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();
    let green = Style::new().green();

    println!();
    println!("{}", green.apply_to("Project ready."));
    println!(
        "{} {} {}",
        dim.apply_to("Template:"),
        resolved.filename,
        dim.apply_to(format!(
            "({}, {})",
            resolved.release_tag,
            match resolved.origin {
                TemplateOrigin::Local => "local cache",
                TemplateOrigin::Github => "downloaded",
            }
        ))
    );
    println!();
    println!("{}", bold.apply_to("Next steps:"));
    let mut step = 1;
    if !merge_into_existing {
        println!("  {}. cd {}", step, project_name);
        step += 1;
    }
    println!(
        "  {}. Open the project with {} ({} holds the assistant context)",
        step, agent.name, agent.context_dir
    );
    println!(
        "  {}. Start with the /specify command to describe what you want to build",
        step + 1
    );
    println!();
}
