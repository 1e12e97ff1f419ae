//! Publication strategy engine.
//!
//! Publishing is two phases:
//!
//! 1. [`prepare`]: validate the configuration and resolve the remote target.
//!    Every problem is reported at once; nothing is touched.
//! 2. [`publish`]: acquire a working tree, stage the site, commit, push.
//!    Any failure before the push aborts without pushing.
//!
//! ```text
//! acquire (init | clone) ─► stage (strategy) ─► commit ─► push (force per strategy)
//! ```

mod error;
mod settings;
mod strategy;
mod target;


pub use error::PublishError;
pub use settings::PublishSettings;
pub use strategy::{Acquire, PublishType};
pub use target::{RemoteTarget, resolve_target};

use crate::{
    config::{ConfigDiagnostics, EmptyCommitPolicy, SiteConfig},
    log,
    logger::Step,
    vcs::{CommitOutcome, Remote, Vcs, WorkingTree},
};
use anyhow::{anyhow, bail};
use std::path::Path;

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new commit was pushed.
    Published { commit: String, forced: bool },
    /// The remote branch already had this content; nothing was pushed.
    Unchanged,
}

/// Validate `config` and resolve its remote target.
///
/// Section checks, target resolution and strategy settings all report into
/// one set of diagnostics.
pub fn prepare(
    config: &SiteConfig,
) -> Result<(Box<dyn RemoteTarget>, PublishSettings), PublishError> {
    let mut diag = ConfigDiagnostics::new();
    config.validate(&mut diag);

    let target = match resolve_target(&config.publish) {
        Ok(target) => Some(target),
        Err(errors) => {
            diag.extend(errors);
            None
        }
    };

    let default_branch = target.as_ref().map_or("", |t| t.default_branch());
    let settings = match PublishSettings::validate(config, default_branch) {
        Ok(settings) => Some(settings),
        Err(errors) => {
            diag.extend(errors);
            None
        }
    };

    match (target, settings) {
        (Some(target), Some(settings)) if diag.is_empty() => Ok((target, settings)),
        _ => Err(PublishError::Validation(diag)),
    }
}

/// Publish `settings.source` to `remote` using a working tree at `tree_dir`.
///
/// `tree_dir` must not exist yet (or be empty) and must not lie inside the
/// source directory. The caller owns its cleanup.
pub fn publish<V: Vcs>(
    vcs: &V,
    remote: &Remote,
    settings: &PublishSettings,
    tree_dir: &Path,
) -> Result<PublishOutcome, PublishError> {
    let strategy = settings.publish_type.strategy();
    let force = strategy.force_push();

    log!("publish"; "{} to {}", settings.publish_type, remote);

    let step = Step::start("acquire");
    check_tree_dir(tree_dir, &settings.source)
        .map_err(|e| PublishError::working_tree(remote, e))?;
    let mut tree = match strategy.acquire() {
        Acquire::Init => vcs.init(remote, tree_dir),
        Acquire::Clone => vcs.clone_branch(remote, tree_dir),
    }
    .map_err(|e| PublishError::working_tree(remote, e))?;
    step.done();

    let step = Step::start("stage");
    strategy
        .stage(&mut tree, settings)
        .map_err(|e| PublishError::working_tree(remote, e))?;
    step.done();

    let step = Step::start("commit");
    let outcome = tree
        .commit(&settings.identity, &settings.message)
        .map_err(|e| PublishError::commit(remote, e))?;
    step.done();

    let commit = match outcome {
        CommitOutcome::Committed(id) => id,
        CommitOutcome::NothingToCommit => {
            return match settings.empty_commit {
                EmptyCommitPolicy::Skip => {
                    log!("publish"; "nothing changed on `{}`, skipping push", remote.branch);
                    Ok(PublishOutcome::Unchanged)
                }
                EmptyCommitPolicy::Fail => Err(PublishError::NothingToCommit {
                    branch: remote.branch.clone(),
                }),
            };
        }
    };

    let step = Step::start("push");
    tree.push(force).map_err(|e| PublishError::push(remote, e))?;
    step.done();

    log!("publish"; "published {} to {}", short_id(&commit), remote);
    Ok(PublishOutcome::Published {
        commit,
        forced: force,
    })
}

/// The working tree must be a fresh directory outside the published site.
fn check_tree_dir(tree_dir: &Path, source: &Path) -> anyhow::Result<()> {
    if tree_dir.starts_with(source) {
        bail!(
            "working tree {} is inside the site directory {}",
            tree_dir.display(),
            source.display()
        );
    }
    if tree_dir.exists() {
        let mut entries = tree_dir
            .read_dir()
            .map_err(|e| anyhow!("cannot use {} as working tree: {e}", tree_dir.display()))?;
        if entries.next().is_some() {
            bail!("working tree directory is not empty: {}", tree_dir.display());
        }
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
