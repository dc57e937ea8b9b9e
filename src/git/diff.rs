//! Local changed-file retrieval via libgit2

use git2::{DiffOptions, Repository, StatusOptions};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ChangePlanError, Result};

/// Diff operations against the local repository
pub struct GitDiff {
    repo: Repository,
}

impl GitDiff {
    /// Discover the repository containing the given path
    pub fn new(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            ChangePlanError::retrieval(format!(
                "no git repository at {}: {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Self { repo })
    }

    /// List paths that differ between two revisions (old and new names,
    /// sorted, deduplicated)
    pub fn changed_between(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let mut files: HashSet<String> = HashSet::new();

        let from_tree = self.resolve_tree(from)?;
        let to_tree = self.resolve_tree(to)?;

        let mut diff_opts = DiffOptions::new();
        let diff = self.repo.diff_tree_to_tree(
            Some(&from_tree),
            Some(&to_tree),
            Some(&mut diff_opts),
        )?;

        diff.foreach(
            &mut |delta, _| {
                if let Some(path) = delta.new_file().path() {
                    files.insert(path.to_string_lossy().to_string());
                }
                if let Some(path) = delta.old_file().path() {
                    files.insert(path.to_string_lossy().to_string());
                }
                true
            },
            None,
            None,
            None,
        )?;

        let mut result: Vec<String> = files.into_iter().collect();
        result.sort();

        Ok(result)
    }

    /// List staged, unstaged, and untracked paths
    pub fn uncommitted(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);
        opts.recurse_untracked_dirs(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        for entry in statuses.iter() {
            if let Some(path) = entry.path() {
                files.push(path.to_string());
            }
        }

        Ok(files)
    }

    fn resolve_tree(&self, rev: &str) -> Result<git2::Tree<'_>> {
        let obj = self.repo.revparse_single(rev).map_err(|e| {
            ChangePlanError::retrieval(format!(
                "failed to resolve revision '{}': {}",
                rev,
                e.message()
            ))
        })?;

        Ok(obj.peel_to_commit()?.tree()?)
    }
}
