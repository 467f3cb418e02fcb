//! Git repository detection and initialization.
//!
//! Local operations only: detect whether the project path is already inside
//! a repository, and otherwise init one with all materialized files staged
//! into an initial commit.

use std::path::Path;

use git2::{IndexAddOption, Repository, Signature};

use crate::error::Result;

/// Check whether `path` is inside a git repository.
pub fn is_git_repo(path: &Path) -> bool {
    path.is_dir() && Repository::discover(path).is_ok()
}

/// Initialize a repository at `path`, stage everything, and create the
/// initial commit.
pub fn init_git_repo(path: &Path) -> Result<()> {
    let repo = Repository::init(path)?;

    let mut index = repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    // Users without a configured git identity still get a commit.
    let signature = repo
        .signature()
        .or_else(|_| Signature::now("Specify", "specify@localhost"))?;

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit from Specify template",
        &tree,
        &[],
    )?;
    Ok(())
}
