//! `sitepub publish`: push the built site to the configured branch.

use crate::{
    config::SiteConfig,
    log,
    publish::{self, PublishOutcome},
    vcs::Git,
};
use anyhow::{Context, Result};
use tempfile::TempDir;

/// Prefix of temporary working tree directories.
const WORK_DIR_PREFIX: &str = "sitepub-";

pub fn publish_site(config: &SiteConfig) -> Result<()> {
    let (target, settings) = publish::prepare(config)?;
    let git = Git::new()?;
    let remote = target.remote(&settings.branch);

    let work_dir = create_work_dir(config)?;
    let tree_dir = work_dir.path().join("tree");
    let result = publish::publish(&git, &remote, &settings, &tree_dir);

    if config.publish.keep_work_dir {
        let kept = work_dir.keep();
        log!("publish"; "working tree kept at {}", kept.join("tree").display());
    }

    match result? {
        PublishOutcome::Published { commit, forced } => {
            let mode = if forced { "force-pushed" } else { "pushed" };
            log!("publish"; "{mode} {commit} to {remote}");
        }
        PublishOutcome::Unchanged => {
            log!("publish"; "{remote} is up to date");
        }
    }
    Ok(())
}

/// Unique directory for this publish, under `publish.work_dir` when set.
fn create_work_dir(config: &SiteConfig) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(WORK_DIR_PREFIX);

    match &config.publish.work_dir {
        Some(parent) => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
            builder.tempdir_in(parent)
        }
        None => builder.tempdir(),
    }
    .context("Failed to create temporary working directory")
}
