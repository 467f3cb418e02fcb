//! Local template discovery.
//!
//! Before going to the network, the pipeline looks for a cached template
//! archive in the installation templates directory (and an optional extra
//! directory). Discovery never fails: absent directories and unparsable
//! filenames are skipped, and the highest parse-valid version wins.

use std::fs;
use std::path::{Path, PathBuf};

use crate::template::version::{self, TemplateVersion};
use crate::tracker::Reporter;

/// Environment override for the installation templates directory.
pub const TEMPLATES_DIR_ENV: &str = "SPECIFY_TEMPLATES_DIR";

/// A locally cached template archive with its parsed version.
#[derive(Debug, Clone)]
pub struct TemplateCandidate {
    pub path: PathBuf,
    pub version: TemplateVersion,
}

/// The installation templates directory: `SPECIFY_TEMPLATES_DIR` when set,
/// otherwise `<user data dir>/specify/templates`. May not exist.
pub fn installation_templates_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(TEMPLATES_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("specify")
        .join("templates")
}

/// Find the newest local template for the requested variant.
///
/// Searches the installation templates directory first, then `extra_dir` when
/// given. Returns `None` when nothing matches; this operation never errors.
pub fn find_local_template(
    assistant: &str,
    script_type: &str,
    extra_dir: Option<&Path>,
    reporter: &dyn Reporter,
) -> Option<TemplateCandidate> {
    let primary = installation_templates_dir();
    let mut search_dirs = vec![primary.clone()];
    if let Some(extra) = extra_dir {
        if extra != primary {
            search_dirs.push(extra.to_path_buf());
        }
    }

    find_in_dirs(assistant, script_type, &search_dirs, reporter)
}

/// Scan the given directories for template archives of the requested variant
/// and pick the single highest version across all of them.
pub fn find_in_dirs(
    assistant: &str,
    script_type: &str,
    search_dirs: &[PathBuf],
    reporter: &dyn Reporter,
) -> Option<TemplateCandidate> {
    let pattern = version::asset_pattern(assistant, script_type);
    let mut candidates = Vec::new();

    for dir in search_dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        reporter.note(&format!(
            "Searching for local template: {}-v*.zip in {}",
            pattern,
            dir.display()
        ));
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(parsed) = version::parse_template_filename(name, assistant, script_type) {
                candidates.push(TemplateCandidate {
                    path: entry.path(),
                    version: parsed,
                });
            }
        }
    }

    if candidates.is_empty() {
        reporter.note(&format!(
            "No local template found matching pattern: {}-v*.zip",
            pattern
        ));
        return None;
    }

    candidates.sort_by(|a, b| b.version.cmp(&a.version));
    let best = candidates.remove(0);
    reporter.note(&format!(
        "Found local template: {} ({})",
        best.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?"),
        best.version
    ));
    if !candidates.is_empty() {
        reporter.note(&format!(
            "Other versions available: {}",
            candidates
                .iter()
                .filter_map(|c| c.path.file_name().and_then(|n| n.to_str()))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    Some(best)
}
