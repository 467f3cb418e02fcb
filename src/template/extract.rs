//! Archive materialization.
//!
//! Extracts a resolved template archive into the destination directory in
//! one of two modes:
//!
//! - *Fresh directory*: the destination must not exist. The archive is
//!   staged into a sibling working directory, a single nested root is
//!   flattened inside the staging area, and the final tree is renamed into
//!   place in one step. On failure only the staging tree is removed; a
//!   partially populated destination never exists.
//! - *Merge into existing*: the archive is staged in a private temp area and
//!   reconciled item-by-item against the destination. Directories merge
//!   recursively, files overwrite, and `.vscode/settings.json` goes through
//!   the injected JSON-merge collaborator instead of being overwritten.
//!   Merge failures degrade to a plain copy with a warning; no rollback is
//!   attempted since the destination pre-exists.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SpecifyError};
use crate::merge::SettingsMerger;
use crate::temp::temp_dir_base;
use crate::tracker::Reporter;

/// Where and how to materialize a template.
#[derive(Debug, Clone)]
pub struct MaterializationTarget {
    pub destination: PathBuf,
    /// Extract into a pre-existing, possibly non-empty directory instead of
    /// creating a brand-new one.
    pub merge_into_existing: bool,
}

/// Extract `archive` into the target, reporting the `extract`, `zip-list`,
/// `extracted-summary`, and `flatten` steps.
pub fn materialize(
    archive: &Path,
    target: &MaterializationTarget,
    merger: Option<&dyn SettingsMerger>,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.add("extract", "Extract template");
    reporter.start("extract", None);

    let outcome = if target.merge_into_existing {
        merge_into_existing(archive, &target.destination, merger, reporter)
    } else {
        extract_fresh(archive, &target.destination, reporter)
    };

    match outcome {
        Ok(()) => {
            reporter.complete("extract", None);
            Ok(())
        }
        Err(e) => {
            reporter.error("extract", &e.to_string());
            Err(e)
        }
    }
}

fn extract_fresh(archive: &Path, dest: &Path, reporter: &dyn Reporter) -> Result<()> {
    if dest.exists() {
        return Err(SpecifyError::ProjectDirExists {
            path: dest.display().to_string(),
        });
    }
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    // Stage next to the destination so the final rename stays on one
    // filesystem and the destination appears fully populated or not at all.
    let staging = tempfile::Builder::new()
        .prefix(".specify-stage-")
        .tempdir_in(&parent)?;
    extract_archive(archive, staging.path(), reporter)?;

    let items = top_level_items(staging.path())?;
    reporter.add("extracted-summary", "Summarize extraction");
    reporter.start("extracted-summary", None);
    reporter.complete(
        "extracted-summary",
        Some(&format!("{} top-level items", items.len())),
    );

    if items.len() == 1 && items[0].is_dir() {
        reporter.add("flatten", "Flatten nested directory");
        fs::rename(&items[0], dest)?;
        reporter.complete("flatten", None);
    } else {
        let root = staging.into_path();
        if let Err(e) = fs::rename(&root, dest) {
            let _ = fs::remove_dir_all(&root);
            return Err(e.into());
        }
    }
    Ok(())
}

fn merge_into_existing(
    archive: &Path,
    dest: &Path,
    merger: Option<&dyn SettingsMerger>,
    reporter: &dyn Reporter,
) -> Result<()> {
    let staging = tempfile::TempDir::new_in(temp_dir_base())?;
    extract_archive(archive, staging.path(), reporter)?;

    let items = top_level_items(staging.path())?;
    reporter.add("extracted-summary", "Summarize extraction");
    reporter.start("extracted-summary", None);
    reporter.complete(
        "extracted-summary",
        Some(&format!("temp {} items", items.len())),
    );

    let source_root = if items.len() == 1 && items[0].is_dir() {
        reporter.add("flatten", "Flatten nested directory");
        reporter.complete("flatten", None);
        items[0].clone()
    } else {
        staging.path().to_path_buf()
    };

    for item in top_level_items(&source_root)? {
        let Some(name) = item.file_name() else {
            continue;
        };
        let dest_path = dest.join(name);
        if item.is_dir() {
            if dest_path.exists() {
                merge_directory(&item, &dest_path, merger, reporter)?;
            } else {
                copy_dir_recursive(&item, &dest_path)?;
            }
        } else {
            fs::copy(&item, &dest_path)?;
        }
    }
    Ok(())
}

fn extract_archive(archive: &Path, dest: &Path, reporter: &dyn Reporter) -> Result<()> {
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    reporter.add("zip-list", "List archive contents");
    reporter.start("zip-list", None);
    reporter.complete("zip-list", Some(&format!("{} entries", zip.len())));
    zip.extract(dest)?;
    Ok(())
}

fn top_level_items(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut items: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    items.sort();
    Ok(items)
}

/// Merge one source directory into an existing destination directory,
/// file by file, creating intermediate directories as needed.
fn merge_directory(
    src: &Path,
    dest: &Path,
    merger: Option<&dyn SettingsMerger>,
    reporter: &dyn Reporter,
) -> Result<()> {
    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| SpecifyError::ExtractionFailed {
                message: e.to_string(),
            })?;
        let dest_file = dest.join(rel);
        if let Some(parent) = dest_file.parent() {
            fs::create_dir_all(parent)?;
        }
        if is_vscode_settings(&dest_file) {
            merge_settings_file(entry.path(), &dest_file, merger, reporter)?;
        } else {
            fs::copy(entry.path(), &dest_file)?;
        }
    }
    Ok(())
}

fn is_vscode_settings(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == "settings.json")
        && path
            .parent()
            .and_then(|p| p.file_name())
            .is_some_and(|n| n == ".vscode")
}

/// Merge the template's settings file into an existing one through the
/// collaborator. Best-effort: on any failure, or when no collaborator is
/// supplied, falls back to an overwrite copy and warns.
fn merge_settings_file(
    src: &Path,
    dest_file: &Path,
    merger: Option<&dyn SettingsMerger>,
    reporter: &dyn Reporter,
) -> Result<()> {
    if !dest_file.exists() {
        fs::copy(src, dest_file)?;
        return Ok(());
    }
    let Some(merger) = merger else {
        fs::copy(src, dest_file)?;
        return Ok(());
    };

    let merged = fs::read_to_string(src)
        .map_err(SpecifyError::from)
        .and_then(|text| serde_json::from_str(&text).map_err(SpecifyError::from))
        .and_then(|incoming: serde_json::Value| merger.merge(dest_file, &incoming));

    match merged {
        Ok(value) => {
            let mut text = serde_json::to_string_pretty(&value)?;
            text.push('\n');
            fs::write(dest_file, text)?;
        }
        Err(e) => {
            reporter.note(&format!(
                "Warning: could not merge {}, copying instead: {}",
                dest_file.display(),
                e
            ));
            fs::copy(src, dest_file)?;
        }
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let entry_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if entry_path.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::DeepMerger;
    use crate::test_fixtures::{build_template_zip, create_temp_dir};
    use crate::tracker::SilentReporter;

    fn fresh_target(dest: &Path) -> MaterializationTarget {
        MaterializationTarget {
            destination: dest.to_path_buf(),
            merge_into_existing: false,
        }
    }

    fn merge_target(dest: &Path) -> MaterializationTarget {
        MaterializationTarget {
            destination: dest.to_path_buf(),
            merge_into_existing: true,
        }
    }

    #[test]
    fn test_fresh_mode_flattens_single_root() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(
            &zip_path,
            &[
                ("proj/", ""),
                ("proj/README.md", "readme"),
                ("proj/src/main.sh", "echo hi"),
            ],
        );
        let dest = temp.path().join("myproject");

        materialize(&zip_path, &fresh_target(&dest), None, &SilentReporter).unwrap();

        assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "readme");
        assert_eq!(
            fs::read_to_string(dest.join("src/main.sh")).unwrap(),
            "echo hi"
        );
        assert!(!dest.join("proj").exists(), "nested root must be flattened");
    }

    #[test]
    fn test_fresh_mode_multiple_roots_not_flattened() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(&zip_path, &[("a.txt", "a"), ("b.txt", "b")]);
        let dest = temp.path().join("proj");

        materialize(&zip_path, &fresh_target(&dest), None, &SilentReporter).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dest.join("b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_fresh_mode_fails_when_destination_exists() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(&zip_path, &[("a.txt", "a")]);
        let dest = temp.path().join("proj");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("existing.txt"), "keep").unwrap();

        let err = materialize(&zip_path, &fresh_target(&dest), None, &SilentReporter).unwrap_err();
        assert!(matches!(err, SpecifyError::ProjectDirExists { .. }));
        // Pre-existing content is untouched.
        assert_eq!(fs::read_to_string(dest.join("existing.txt")).unwrap(), "keep");
    }

    #[test]
    fn test_fresh_mode_failure_leaves_no_destination() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        fs::write(&zip_path, b"this is not a zip archive").unwrap();
        let dest = temp.path().join("proj");

        let err = materialize(&zip_path, &fresh_target(&dest), None, &SilentReporter).unwrap_err();
        assert!(matches!(err, SpecifyError::ExtractionFailed { .. }));
        assert!(!dest.exists(), "failed run must not leave a destination");
    }

    #[test]
    fn test_merge_mode_merges_existing_directory_file_by_file() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(
            &zip_path,
            &[
                ("proj/", ""),
                ("proj/docs/new.md", "new"),
                ("proj/docs/shared.md", "from template"),
                ("proj/top.txt", "top"),
            ],
        );
        let dest = temp.path().join("existing");
        fs::create_dir_all(dest.join("docs")).unwrap();
        fs::write(dest.join("docs/old.md"), "old").unwrap();
        fs::write(dest.join("docs/shared.md"), "mine").unwrap();

        materialize(&zip_path, &merge_target(&dest), None, &SilentReporter).unwrap();

        // Existing files survive, colliding files are overwritten, new
        // files and top-level items arrive.
        assert_eq!(fs::read_to_string(dest.join("docs/old.md")).unwrap(), "old");
        assert_eq!(
            fs::read_to_string(dest.join("docs/shared.md")).unwrap(),
            "from template"
        );
        assert_eq!(fs::read_to_string(dest.join("docs/new.md")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dest.join("top.txt")).unwrap(), "top");
    }

    #[test]
    fn test_merge_mode_copies_fresh_directories_as_subtrees() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(&zip_path, &[("proj/", ""), ("proj/scripts/run.sh", "run")]);
        let dest = temp.path().join("existing");
        fs::create_dir_all(&dest).unwrap();

        materialize(&zip_path, &merge_target(&dest), None, &SilentReporter).unwrap();
        assert_eq!(
            fs::read_to_string(dest.join("scripts/run.sh")).unwrap(),
            "run"
        );
    }

    #[test]
    fn test_merge_mode_settings_json_union_with_merger() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(
            &zip_path,
            &[("proj/", ""), ("proj/.vscode/settings.json", r#"{"b":2}"#)],
        );
        let dest = temp.path().join("existing");
        fs::create_dir_all(dest.join(".vscode")).unwrap();
        fs::write(dest.join(".vscode/settings.json"), r#"{"a":1}"#).unwrap();

        materialize(
            &zip_path,
            &merge_target(&dest),
            Some(&DeepMerger),
            &SilentReporter,
        )
        .unwrap();

        let merged: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dest.join(".vscode/settings.json")).unwrap())
                .unwrap();
        assert_eq!(merged, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_merge_mode_settings_json_overwritten_without_merger() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(
            &zip_path,
            &[("proj/", ""), ("proj/.vscode/settings.json", r#"{"b":2}"#)],
        );
        let dest = temp.path().join("existing");
        fs::create_dir_all(dest.join(".vscode")).unwrap();
        fs::write(dest.join(".vscode/settings.json"), r#"{"a":1}"#).unwrap();

        materialize(&zip_path, &merge_target(&dest), None, &SilentReporter).unwrap();

        assert_eq!(
            fs::read_to_string(dest.join(".vscode/settings.json")).unwrap(),
            r#"{"b":2}"#
        );
    }

    #[test]
    fn test_merge_mode_unparsable_template_settings_falls_back_to_copy() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(
            &zip_path,
            &[("proj/", ""), ("proj/.vscode/settings.json", "not json {")],
        );
        let dest = temp.path().join("existing");
        fs::create_dir_all(dest.join(".vscode")).unwrap();
        fs::write(dest.join(".vscode/settings.json"), r#"{"a":1}"#).unwrap();

        // Degrades to overwrite, never aborts.
        materialize(
            &zip_path,
            &merge_target(&dest),
            Some(&DeepMerger),
            &SilentReporter,
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(dest.join(".vscode/settings.json")).unwrap(),
            "not json {"
        );
    }

    #[test]
    fn test_merge_mode_overwrites_top_level_files() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(&zip_path, &[("proj/", ""), ("proj/README.md", "template")]);
        let dest = temp.path().join("existing");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("README.md"), "mine").unwrap();

        materialize(&zip_path, &merge_target(&dest), None, &SilentReporter).unwrap();
        assert_eq!(
            fs::read_to_string(dest.join("README.md")).unwrap(),
            "template"
        );
    }

    #[test]
    fn test_merge_mode_without_nested_root_uses_staging_root() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(&zip_path, &[("a.txt", "a"), ("b.txt", "b")]);
        let dest = temp.path().join("existing");
        fs::create_dir_all(&dest).unwrap();

        materialize(&zip_path, &merge_target(&dest), None, &SilentReporter).unwrap();
        assert!(dest.join("a.txt").exists());
        assert!(dest.join("b.txt").exists());
    }

    #[test]
    fn test_is_vscode_settings_detection() {
        assert!(is_vscode_settings(Path::new("/p/.vscode/settings.json")));
        assert!(!is_vscode_settings(Path::new("/p/.vscode/launch.json")));
        assert!(!is_vscode_settings(Path::new("/p/other/settings.json")));
    }
}
