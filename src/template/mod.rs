//! Template acquisition and materialization pipeline.
//!
//! Resolution (local cache first, GitHub release fallback), archive
//! extraction with flatten/merge semantics, and provenance-aware cleanup.
//! All steps report through a [`crate::tracker::Reporter`].

pub mod discovery;
pub mod extract;
pub mod github;
pub mod resolve;
pub mod version;

use std::path::Path;

use crate::error::Result;
use crate::merge::SettingsMerger;
use crate::tracker::Reporter;

pub use extract::MaterializationTarget;
pub use resolve::{ResolvedTemplate, TemplateOrigin};

/// Release repository hosting the template archives.
pub const REPO_OWNER: &str = "github";
pub const REPO_NAME: &str = "spec-kit";

/// Run the full pipeline: resolve the template for the requested variant,
/// materialize it into the target, and apply the cleanup policy.
///
/// Cleanup runs whether or not extraction succeeded, so a freshly downloaded
/// archive never outlives its run; a local archive is always preserved.
/// Returns the resolved template's provenance on success.
pub fn fetch_and_materialize(
    assistant: &str,
    script_type: &str,
    target: &MaterializationTarget,
    download_dir: &Path,
    client: &github::ReleaseClient,
    merger: Option<&dyn SettingsMerger>,
    reporter: &dyn Reporter,
) -> Result<ResolvedTemplate> {
    let resolved = resolve::resolve_template(assistant, script_type, download_dir, client, reporter)?;
    let outcome = extract::materialize(&resolved.archive_path, target, merger, reporter);
    resolve::cleanup_archive(&resolved, reporter);
    outcome?;
    Ok(resolved)
}
