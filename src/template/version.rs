//! Template filename parsing.
//!
//! Release archives follow the naming convention
//! `spec-kit-template-{assistant}-{script_type}-v{major}.{minor}.{patch}.zip`.
//! The version triple is the only metadata carried by the name; everything
//! here is an explicit parser rather than a regex so malformed names are a
//! plain `None` and never an error.

use std::fmt;

/// Prefix shared by every template archive name.
pub const TEMPLATE_PREFIX: &str = "spec-kit-template";

/// Archive suffix for template assets.
pub const TEMPLATE_SUFFIX: &str = ".zip";

/// A three-part semantic version parsed from a template filename.
///
/// The derived `Ord` compares `(major, minor, patch)` numerically, so
/// `1.10.0` sorts above `1.9.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for TemplateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The variant naming pattern `spec-kit-template-{assistant}-{script_type}`.
pub fn asset_pattern(assistant: &str, script_type: &str) -> String {
    format!("{}-{}-{}", TEMPLATE_PREFIX, assistant, script_type)
}

/// Parse `filename` against the full naming convention for the given variant.
///
/// Returns the version triple when the name matches exactly, `None` for
/// anything else (wrong variant, missing suffix, malformed version).
pub fn parse_template_filename(
    filename: &str,
    assistant: &str,
    script_type: &str,
) -> Option<TemplateVersion> {
    let prefix = format!("{}-v", asset_pattern(assistant, script_type));
    let rest = filename.strip_prefix(&prefix)?;
    let version = rest.strip_suffix(TEMPLATE_SUFFIX)?;
    parse_version(version)
}

/// Loose re-derivation of a release tag from any template filename: a
/// trailing `-vX.Y.Z.zip` yields `vX.Y.Z`, anything else degrades to
/// `"unknown"`. Used for provenance of locally cached archives.
pub fn release_tag_from_filename(filename: &str) -> String {
    filename
        .strip_suffix(TEMPLATE_SUFFIX)
        .and_then(|stem| stem.rsplit_once("-v"))
        .and_then(|(_, version)| parse_version(version))
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_version(s: &str) -> Option<TemplateVersion> {
    let mut parts = s.split('.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let patch = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(TemplateVersion {
        major,
        minor,
        patch,
    })
}

// u32::from_str accepts a leading '+', which the naming convention does not.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
