//! `[publish]` section configuration.
//!
//! Contains the publication strategy, commit identity and remote target.
//!
//! # Example
//!
//! ```toml
//! [publish]
//! provider = "github"         # Remote provider: github | git
//! type = "CleanBranch"        # CleanBranch | CleanBranchMaintainHistory | VersionedBranch | VersionedBranchWithLatest
//! branch = ""                 # Target branch (blank = provider default)
//! latest_dir = "latest"       # 'latest' directory for VersionedBranchWithLatest
//! empty_commit = "skip"       # Nothing changed: skip | fail
//!
//! [publish.commit]
//! username = "sitepub"
//! email = "sitepub@sitepub"
//! message = "Deploy to GitHub Pages from sitepub."
//!
//! [publish.github]
//! url = "https://github.com/user/user.github.io"  # Repository URL (HTTPS or SSH)
//! username = "user"                                # Optional: user for token auth
//! token_path = "~/.github-token"                   # Optional: PAT file path
//!
//! [publish.git]
//! url = "git@example.com:me/site.git"
//! default_branch = "main"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Remote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// GitHub Pages repository.
    #[default]
    Github,
    /// Any git remote.
    Git,
}

/// What to do when the staged tree is identical to the remote branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCommitPolicy {
    /// Treat it as a successful publish without committing or pushing.
    #[default]
    Skip,
    /// Fail the publish.
    Fail,
}

/// Publish configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Remote provider: "github" or "git".
    pub provider: Provider,

    /// Publication strategy name.
    #[serde(rename = "type")]
    pub publish_type: String,

    /// Target branch; blank means the provider's default branch.
    pub branch: String,

    /// Name of the 'latest' directory used by `VersionedBranchWithLatest`.
    pub latest_dir: String,

    /// Behaviour when there is nothing to commit.
    pub empty_commit: EmptyCommitPolicy,

    /// Parent directory for temporary working trees (default: system temp dir).
    pub work_dir: Option<PathBuf>,

    /// Keep the working tree after publishing (for inspection).
    pub keep_work_dir: bool,

    /// Commit identity and message.
    pub commit: CommitConfig,

    /// GitHub Pages settings.
    pub github: GithubPublishConfig,

    /// Plain git remote settings.
    pub git: GitPublishConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Github,
            publish_type: "CleanBranch".to_string(),
            branch: String::new(),
            latest_dir: "latest".to_string(),
            empty_commit: EmptyCommitPolicy::Skip,
            work_dir: None,
            keep_work_dir: false,
            commit: CommitConfig::default(),
            github: GithubPublishConfig::default(),
            git: GitPublishConfig::default(),
        }
    }
}

pub struct PublishFields {
    pub publish_type: FieldPath,
    pub branch: FieldPath,
    pub latest_dir: FieldPath,
    pub work_dir: FieldPath,
}

impl PublishConfig {
    pub const FIELDS: PublishFields = PublishFields {
        publish_type: FieldPath::new("publish.type"),
        branch: FieldPath::new("publish.branch"),
        latest_dir: FieldPath::new("publish.latest_dir"),
        work_dir: FieldPath::new("publish.work_dir"),
    };

    /// Validate remote target settings for the selected provider.
    ///
    /// # Checks
    /// - The selected provider has a non-blank `url`.
    /// - If `github.token_path` is set, it must exist and be a file.
    /// - If `work_dir` is set, it must be a directory when it exists.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match self.provider {
            Provider::Github => self.github.validate(diag),
            Provider::Git => self.git.validate(diag),
        }

        if let Some(dir) = &self.work_dir
            && dir.exists()
            && !dir.is_dir()
        {
            diag.error(
                Self::FIELDS.work_dir,
                format!("{} is not a directory: {}", Self::FIELDS.work_dir, dir.display()),
            );
        }
    }
}

// ============================================================================
// [publish.commit]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// The username on the commit.
    pub username: String,

    /// The email on the commit.
    pub email: String,

    /// The commit message attached to each publish.
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            username: "sitepub".to_string(),
            email: "sitepub@sitepub".to_string(),
            message: "Deploy to GitHub Pages from sitepub.".to_string(),
        }
    }
}

pub struct CommitFields {
    pub username: FieldPath,
    pub email: FieldPath,
    pub message: FieldPath,
}

impl CommitConfig {
    pub const FIELDS: CommitFields = CommitFields {
        username: FieldPath::new("publish.commit.username"),
        email: FieldPath::new("publish.commit.email"),
        message: FieldPath::new("publish.commit.message"),
    };
}

// ============================================================================
// [publish.github]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubPublishConfig {
    /// Repository URL (HTTPS or SSH format).
    pub url: String,

    /// User name for token authentication (default: repository owner).
    pub username: Option<String>,

    /// Path to file containing GitHub personal access token.
    ///
    /// # Security
    /// - Store outside repository (e.g., `~/.github-token`)
    /// - Never commit tokens to version control!
    pub token_path: Option<PathBuf>,

    /// Environment variable consulted when `token_path` is not set.
    pub token_env: String,
}

impl Default for GithubPublishConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            token_path: None,
            token_env: "GITHUB_TOKEN".to_string(),
        }
    }
}

pub struct GithubFields {
    pub url: FieldPath,
    pub token_path: FieldPath,
}

impl GithubPublishConfig {
    pub const FIELDS: GithubFields = GithubFields {
        url: FieldPath::new("publish.github.url"),
        token_path: FieldPath::new("publish.github.token_path"),
    };

    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.url,
                "must set the repository url",
                "e.g. url = \"https://github.com/user/user.github.io\"",
            );
        }

        if let Some(path) = &self.token_path {
            if !path.exists() {
                diag.error(
                    Self::FIELDS.token_path,
                    format!("{} file not found: {}", Self::FIELDS.token_path, path.display()),
                );
            } else if !path.is_file() {
                diag.error(
                    Self::FIELDS.token_path,
                    format!("{} is not a file: {}", Self::FIELDS.token_path, path.display()),
                );
            }
        }
    }
}

// ============================================================================
// [publish.git]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitPublishConfig {
    /// Remote URL or local path of the repository.
    pub url: String,

    /// Branch used when `publish.branch` is blank.
    pub default_branch: String,
}

impl Default for GitPublishConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            default_branch: "main".to_string(),
        }
    }
}

pub struct GitFields {
    pub url: FieldPath,
    pub default_branch: FieldPath,
}

impl GitPublishConfig {
    pub const FIELDS: GitFields = GitFields {
        url: FieldPath::new("publish.git.url"),
        default_branch: FieldPath::new("publish.git.default_branch"),
    };

    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url.trim().is_empty() {
            diag.error(Self::FIELDS.url, "must set the repository url");
        }
    }
}
