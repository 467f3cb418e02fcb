//! Template resolution and archive cleanup.
//!
//! Resolution is local-first: a cached archive in the templates directory
//! short-circuits the remote path entirely, so pre-packaged templates avoid
//! network dependency and API rate limits. The resolved template carries
//! provenance, which the cleanup policy consults after materialization.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::template::discovery;
use crate::template::github::ReleaseClient;
use crate::template::version;
use crate::tracker::Reporter;

/// Where a resolved archive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOrigin {
    Local,
    Github,
}

impl TemplateOrigin {
    /// Provenance string as surfaced in metadata records.
    #[allow(dead_code)]
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateOrigin::Local => "local",
            TemplateOrigin::Github => "github",
        }
    }
}

/// One resolved template archive plus its provenance metadata.
///
/// Produced once per materialization run and consumed by the materializer
/// and the cleanup policy.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub archive_path: PathBuf,
    pub filename: String,
    pub size_bytes: u64,
    pub release_tag: String,
    pub asset_url: String,
    pub origin: TemplateOrigin,
}

/// Resolve the template archive for the requested variant.
///
/// Local candidates win; otherwise the latest GitHub release asset is
/// downloaded into `download_dir`. Reports the `fetch` and `download` steps.
pub fn resolve_template(
    assistant: &str,
    script_type: &str,
    download_dir: &Path,
    client: &ReleaseClient,
    reporter: &dyn Reporter,
) -> Result<ResolvedTemplate> {
    reporter.add("fetch", "Check for local template");

    if let Some(local) = discovery::find_local_template(assistant, script_type, None, reporter) {
        let filename = local
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        reporter.complete("fetch", Some(&format!("found {}", filename)));
        reporter.add("download", "Download template");
        reporter.skip("download", "using local template");

        let size_bytes = fs::metadata(&local.path).map(|m| m.len()).unwrap_or(0);
        // The tag is re-derived loosely from the filename; a missing version
        // suffix degrades to "unknown" rather than failing.
        let release_tag = version::release_tag_from_filename(&filename);
        return Ok(ResolvedTemplate {
            asset_url: format!("file://{}", local.path.display()),
            archive_path: local.path,
            filename,
            size_bytes,
            release_tag,
            origin: TemplateOrigin::Local,
        });
    }

    reporter.complete("fetch", Some("not found, downloading from GitHub"));
    reporter.start("fetch", Some("contacting GitHub API"));

    let fetched = fetch_from_github(assistant, script_type, download_dir, client, reporter);
    match fetched {
        Ok(resolved) => Ok(resolved),
        Err(e) => {
            reporter.error("fetch", &e.to_string());
            Err(e)
        }
    }
}

fn fetch_from_github(
    assistant: &str,
    script_type: &str,
    download_dir: &Path,
    client: &ReleaseClient,
    reporter: &dyn Reporter,
) -> Result<ResolvedTemplate> {
    let release = client.latest_release(super::REPO_OWNER, super::REPO_NAME)?;
    let asset = ReleaseClient::select_asset(&release, assistant, script_type)?;
    reporter.complete(
        "fetch",
        Some(&format!("release {} ({} bytes)", release.tag_name, asset.size)),
    );

    reporter.add("download", "Download template");
    reporter.start("download", None);
    let archive_path = client.download_asset(asset, download_dir, reporter)?;
    reporter.complete("download", Some(&asset.name));

    Ok(ResolvedTemplate {
        archive_path,
        filename: asset.name.clone(),
        size_bytes: asset.size,
        release_tag: release.tag_name.clone(),
        asset_url: asset.browser_download_url.clone(),
        origin: TemplateOrigin::Github,
    })
}

/// Delete the archive if and only if it was downloaded from GitHub.
///
/// Runs after materialization in both the success and the failure path, so a
/// fresh download never outlives its run; a locally cached archive is always
/// preserved.
pub fn cleanup_archive(resolved: &ResolvedTemplate, reporter: &dyn Reporter) {
    reporter.add("cleanup", "Remove temporary archive");
    if resolved.origin == TemplateOrigin::Github {
        if resolved.archive_path.exists() {
            let _ = fs::remove_file(&resolved.archive_path);
        }
        reporter.complete("cleanup", None);
    } else {
        reporter.skip("cleanup", "local template preserved");
    }
}
