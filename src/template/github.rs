//! GitHub release metadata fetch and asset download.
//!
//! Two sequential blocking requests: the latest-release endpoint (short
//! timeout, must be 200 with parseable JSON) and the asset's binary download
//! URL (longer timeout, redirect-following, streamed to disk in 8 KiB
//! chunks). Non-200 responses carry status, headers, and a truncated body in
//! the error for diagnosis. A failed download removes the partial file before
//! the error propagates.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SpecifyError};
use crate::template::version::{self, TEMPLATE_SUFFIX};
use crate::tracker::Reporter;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const CHUNK_SIZE: usize = 8192;

/// Latest-release metadata returned by the GitHub API.
#[derive(Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A single release asset entry, in API listing order.
#[derive(Debug, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

/// Blocking client for the release-hosting API.
pub struct ReleaseClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl ReleaseClient {
    /// Build a client. `cli_token` takes priority over the `GH_TOKEN` and
    /// `GITHUB_TOKEN` environment variables; empty or whitespace-only values
    /// count as absent.
    pub fn new(cli_token: Option<&str>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("specify-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_API_BASE.to_string(),
            token: resolve_token(cli_token),
        })
    }

    /// Point the client at a different API base (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch latest-release metadata for `owner/repo`.
    pub fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = format!("{}/repos/{}/{}/releases/latest", self.base_url, owner, repo);
        let mut request = self.http.get(&url).timeout(METADATA_TIMEOUT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(|e| SpecifyError::MetadataFetchFailed {
            url: url.clone(),
            status: "transport error".to_string(),
            detail: e.to_string(),
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let headers = format!("{:?}", response.headers());
            let body = response.text().unwrap_or_default();
            return Err(SpecifyError::MetadataFetchFailed {
                url,
                status: status.to_string(),
                detail: format!(
                    "headers: {}\nbody (truncated): {}",
                    headers,
                    truncate(&body, 500)
                ),
            });
        }

        let body = response.text().map_err(|e| SpecifyError::MetadataFetchFailed {
            url,
            status: status.to_string(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| SpecifyError::ReleaseParseFailed {
            detail: format!("{}\nraw (truncated): {}", e, truncate(&body, 400)),
        })
    }

    /// Select the release asset for the requested variant: the first asset in
    /// listing order whose name contains the variant pattern and ends with
    /// the archive suffix.
    pub fn select_asset<'r>(
        release: &'r Release,
        assistant: &str,
        script_type: &str,
    ) -> Result<&'r ReleaseAsset> {
        let pattern = version::asset_pattern(assistant, script_type);
        release
            .assets
            .iter()
            .find(|asset| asset.name.contains(&pattern) && asset.name.ends_with(TEMPLATE_SUFFIX))
            .ok_or_else(|| SpecifyError::AssetNotFound {
                pattern,
                available: if release.assets.is_empty() {
                    "(no assets)".to_string()
                } else {
                    release
                        .assets
                        .iter()
                        .map(|a| a.name.as_str())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            })
    }

    /// Stream `asset` into `dest_dir`, reporting per-chunk percentages on the
    /// `download` step when the total size is known. On failure the partial
    /// file is removed before the error is returned.
    pub fn download_asset(
        &self,
        asset: &ReleaseAsset,
        dest_dir: &Path,
        reporter: &dyn Reporter,
    ) -> Result<PathBuf> {
        let dest = dest_dir.join(&asset.name);
        let mut request = self.http.get(&asset.browser_download_url).timeout(DOWNLOAD_TIMEOUT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let mut response = request.send().map_err(|e| SpecifyError::DownloadFailed {
            detail: e.to_string(),
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let headers = format!("{:?}", response.headers());
            let body = response.text().unwrap_or_default();
            return Err(SpecifyError::DownloadFailed {
                detail: format!(
                    "download failed with {}\nheaders: {}\nbody (truncated): {}",
                    status,
                    headers,
                    truncate(&body, 400)
                ),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let result = stream_to_file(&mut response, &dest, total, reporter);
        if result.is_err() && dest.exists() {
            let _ = fs::remove_file(&dest);
        }
        result?;
        Ok(dest)
    }
}

fn stream_to_file(
    response: &mut reqwest::blocking::Response,
    dest: &Path,
    total: u64,
    reporter: &dyn Reporter,
) -> Result<()> {
    let mut file = fs::File::create(dest).map_err(|e| SpecifyError::DownloadFailed {
        detail: format!("failed to create {}: {}", dest.display(), e),
    })?;
    let mut buf = [0u8; CHUNK_SIZE];
    let mut downloaded: u64 = 0;
    loop {
        let n = response.read(&mut buf).map_err(|e| SpecifyError::DownloadFailed {
            detail: format!("stream interrupted: {}", e),
        })?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(|e| SpecifyError::DownloadFailed {
            detail: format!("failed to write {}: {}", dest.display(), e),
        })?;
        downloaded += n as u64;
        if total > 0 {
            reporter.progress("download", ((downloaded * 100) / total).min(100) as u8);
        }
    }
    // A known total with fewer bytes than promised is a truncated stream.
    if total > 0 && downloaded < total {
        return Err(SpecifyError::DownloadFailed {
            detail: format!("stream ended after {} of {} bytes", downloaded, total),
        });
    }
    Ok(())
}

/// Token priority: explicit parameter, then `GH_TOKEN`, then `GITHUB_TOKEN`.
/// Empty and whitespace-only values are treated as absent.
pub fn resolve_token(cli_token: Option<&str>) -> Option<String> {
    let from_env = |name: &str| std::env::var(name).ok();
    [
        cli_token.map(str::to_string),
        from_env("GH_TOKEN"),
        from_env("GITHUB_TOKEN"),
    ]
    .into_iter()
    .flatten()
    .map(|t| t.trim().to_string())
    .find(|t| !t.is_empty())
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
