//! Publish types and the strategy behind each one.
//!
//! | Type                         | Acquire | Staging                                 | Force |
//! |------------------------------|---------|-----------------------------------------|-------|
//! | `CleanBranch`                | init    | copy output into root                   | yes   |
//! | `CleanBranchMaintainHistory` | clone   | delete everything, copy into root       | no    |
//! | `VersionedBranch`            | clone   | replace `<version>/`                    | no    |
//! | `VersionedBranchWithLatest`  | clone   | replace `<version>/` and `<latest>/`    | yes   |

use super::PublishSettings;
use crate::vcs::WorkingTree;
use anyhow::Result;
use std::{fmt, path::Path};

/// How built content is merged into the remote branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PublishType {
    /// New branch with no history, force-pushed. Overwrites the branch completely.
    #[value(alias = "CleanBranch")]
    CleanBranch,
    /// Clone the branch, remove all files, add the site. Keeps history.
    #[value(alias = "CleanBranchMaintainHistory")]
    CleanBranchMaintainHistory,
    /// Clone the branch, add the site under a versioned subfolder. Keeps all prior versions.
    #[value(alias = "VersionedBranch")]
    VersionedBranch,
    /// Like `VersionedBranch`, plus a 'latest' subfolder, force-pushed.
    #[value(alias = "VersionedBranchWithLatest")]
    VersionedBranchWithLatest,
}

impl PublishType {
    pub const ALL: [Self; 4] = [
        Self::CleanBranch,
        Self::CleanBranchMaintainHistory,
        Self::VersionedBranch,
        Self::VersionedBranchWithLatest,
    ];

    /// Config name (`publish.type`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::CleanBranch => "CleanBranch",
            Self::CleanBranchMaintainHistory => "CleanBranchMaintainHistory",
            Self::VersionedBranch => "VersionedBranch",
            Self::VersionedBranchWithLatest => "VersionedBranchWithLatest",
        }
    }

    /// Parse a config name. Case-insensitive, `-`/`_` separators allowed
    /// (`clean-branch`, `versioned_branch`).
    pub fn parse(name: &str) -> Option<Self> {
        let wanted: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(&wanted))
    }

    /// Whether the site version names a subdirectory.
    pub const fn is_versioned(self) -> bool {
        matches!(
            self,
            Self::VersionedBranch | Self::VersionedBranchWithLatest
        )
    }

    /// The strategy implementing this type.
    pub fn strategy(self) -> &'static dyn Strategy {
        match self {
            Self::CleanBranch => &CleanBranch,
            Self::CleanBranchMaintainHistory => &CleanBranchMaintainHistory,
            Self::VersionedBranch => &VersionedBranch,
            Self::VersionedBranchWithLatest => &VersionedBranchWithLatest,
        }
    }
}

impl fmt::Display for PublishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a working tree is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// Fresh repository, no history.
    Init,
    /// Checkout of the existing remote branch.
    Clone,
}

/// One publication strategy.
pub trait Strategy {
    fn acquire(&self) -> Acquire;

    /// Fixed per strategy; no other setting changes it.
    fn force_push(&self) -> bool;

    /// Mutate the tree so it holds the new site.
    fn stage(&self, tree: &mut dyn WorkingTree, settings: &PublishSettings) -> Result<()>;
}

struct CleanBranch;
struct CleanBranchMaintainHistory;
struct VersionedBranch;
struct VersionedBranchWithLatest;

impl Strategy for CleanBranch {
    fn acquire(&self) -> Acquire {
        Acquire::Init
    }

    fn force_push(&self) -> bool {
        true
    }

    fn stage(&self, tree: &mut dyn WorkingTree, settings: &PublishSettings) -> Result<()> {
        tree.copy_from(&settings.source, None)?;
        Ok(())
    }
}

impl Strategy for CleanBranchMaintainHistory {
    fn acquire(&self) -> Acquire {
        Acquire::Clone
    }

    fn force_push(&self) -> bool {
        false
    }

    fn stage(&self, tree: &mut dyn WorkingTree, settings: &PublishSettings) -> Result<()> {
        tree.delete(None)?;
        tree.copy_from(&settings.source, None)?;
        Ok(())
    }
}

impl Strategy for VersionedBranch {
    fn acquire(&self) -> Acquire {
        Acquire::Clone
    }

    fn force_push(&self) -> bool {
        false
    }

    fn stage(&self, tree: &mut dyn WorkingTree, settings: &PublishSettings) -> Result<()> {
        replace_sub_dir(tree, &settings.version, &settings.source)
    }
}

impl Strategy for VersionedBranchWithLatest {
    fn acquire(&self) -> Acquire {
        Acquire::Clone
    }

    fn force_push(&self) -> bool {
        true
    }

    fn stage(&self, tree: &mut dyn WorkingTree, settings: &PublishSettings) -> Result<()> {
        replace_sub_dir(tree, &settings.version, &settings.source)?;
        replace_sub_dir(tree, &settings.latest_dir, &settings.source)
    }
}

/// Empty `name/` (stale files must not survive) and fill it from `source`.
fn replace_sub_dir(tree: &mut dyn WorkingTree, name: &str, source: &Path) -> Result<()> {
    let sub = tree.make_sub_dir(name)?;
    tree.delete(Some(&sub))?;
    tree.copy_from(source, Some(&sub))?;
    Ok(())
}
