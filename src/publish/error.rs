//! Publish error taxonomy.
//!
//! Every variant is fatal; the pipeline stops at the first one and never
//! pushes after a failed step. Retrying is up to the caller.

use crate::config::ConfigDiagnostics;
use crate::vcs::Remote;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    /// Bad or missing configuration, reported before anything is touched.
    // NOTE: No #[from] here - we don't want source() which causes duplicate output
    #[error("{0}")]
    Validation(ConfigDiagnostics),

    /// Init/clone or staging failed; nothing was committed.
    #[error("failed to prepare working tree for {remote}")]
    WorkingTree {
        remote: String,
        #[source]
        source: anyhow::Error,
    },

    /// The staged tree is identical to the remote branch.
    #[error("nothing to commit on branch `{branch}`")]
    NothingToCommit { branch: String },

    #[error("failed to commit to branch `{branch}`")]
    Commit {
        branch: String,
        #[source]
        source: anyhow::Error,
    },

    /// Authentication, network or remote rejection. The build output is
    /// still valid locally.
    #[error("failed to push to {remote}")]
    Push {
        remote: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PublishError {
    pub(crate) fn working_tree(remote: &Remote, source: anyhow::Error) -> Self {
        Self::WorkingTree {
            remote: remote.to_string(),
            source,
        }
    }

    pub(crate) fn commit(remote: &Remote, source: anyhow::Error) -> Self {
        Self::Commit {
            branch: remote.branch.clone(),
            source,
        }
    }

    pub(crate) fn push(remote: &Remote, source: anyhow::Error) -> Self {
        Self::Push {
            remote: remote.to_string(),
            source,
        }
    }
}
