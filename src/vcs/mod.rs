//! Version-control facade.
//!
//! The publish engine only talks to these two traits:
//!
//! - [`Vcs`] acquires a [`WorkingTree`] for a [`Remote`], either as a fresh
//!   repository (`init`) or as a checkout of the remote branch (`clone_branch`).
//! - [`WorkingTree`] stages content, commits and pushes.
//!
//! Filesystem staging (`copy_from`, `delete`, `make_sub_dir`) has default
//! implementations on top of [`WorkingTree::root`]; backends only provide
//! `commit` and `push`. [`Git`] is the `git` command-line backend.

mod fs;
mod git;
mod remote;

#[cfg(test)]
mod tests;

pub use fs::{clear_dir, copy_dir};
pub use git::Git;
pub use remote::Remote;

use crate::utils::path::is_plain_component;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Acquires working trees for a remote branch.
pub trait Vcs {
    type Tree: WorkingTree;

    /// Initialize an empty repository in `dir` whose `HEAD` is `remote.branch`.
    fn init(&self, remote: &Remote, dir: &Path) -> Result<Self::Tree>;

    /// Check out `remote.branch` into `dir`, keeping its history.
    fn clone_branch(&self, remote: &Remote, dir: &Path) -> Result<Self::Tree>;
}

/// Commit author and committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Result of [`WorkingTree::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// New commit id (hex).
    Committed(String),
    /// The staged tree equals `HEAD`.
    NothingToCommit,
}

/// A subdirectory of a working tree, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDir(PathBuf);

impl SubDir {
    pub(crate) fn new(name: impl Into<PathBuf>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &Path {
        &self.0
    }
}

/// A local checkout exclusively owned by one publish operation.
pub trait WorkingTree {
    /// Root directory of the checkout.
    fn root(&self) -> &Path;

    /// Record all changes in the tree as one commit.
    fn commit(&mut self, identity: &CommitIdentity, message: &str) -> Result<CommitOutcome>;

    /// Push `HEAD` to the remote branch.
    fn push(&mut self, force: bool) -> Result<()>;

    /// Copy the contents of `from` into the tree root or into `into`.
    ///
    /// Returns the number of files copied.
    fn copy_from(&mut self, from: &Path, into: Option<&SubDir>) -> Result<usize> {
        let target = self.resolve(into);
        copy_dir(from, &target)
    }

    /// Delete everything in the tree (except `.git`), or everything in `subdir`.
    fn delete(&mut self, subdir: Option<&SubDir>) -> Result<()> {
        clear_dir(&self.resolve(subdir))
    }

    /// Create (if needed) the subdirectory `name` and return a handle to it.
    fn make_sub_dir(&mut self, name: &str) -> Result<SubDir> {
        if !is_plain_component(name) {
            bail!("`{name}` is not a valid directory name");
        }
        std::fs::create_dir_all(self.root().join(name))?;
        Ok(SubDir::new(name))
    }

    /// Absolute path of `subdir`, or the root.
    fn resolve(&self, subdir: Option<&SubDir>) -> PathBuf {
        match subdir {
            Some(sub) => self.root().join(sub.name()),
            None => self.root().to_path_buf(),
        }
    }
}
