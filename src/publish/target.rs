//! Remote targets: where a publish goes and how it is shown.
//!
//! A target yields a machine URL (may embed credentials), a display URL
//! (never does) and the branch used when `publish.branch` is blank.

use crate::{
    config::{
        ConfigDiagnostics, GitPublishConfig, GithubPublishConfig, Provider, PublishConfig,
        extract_url_path,
    },
    debug,
    vcs::Remote,
};
use std::fs;
use url::Url;

/// Default branch of GitHub Pages repositories.
pub const GITHUB_PAGES_BRANCH: &str = "gh-pages";

pub trait RemoteTarget {
    /// URL handed to `git`.
    fn url(&self) -> &str;

    /// URL shown to humans; free of credentials.
    fn display_url(&self) -> &str;

    fn default_branch(&self) -> &str;

    /// Credential to scrub from any output.
    fn secret(&self) -> Option<&str> {
        None
    }

    /// Remote handle for `branch`.
    fn remote(&self, branch: &str) -> Remote {
        Remote::new(self.url(), self.display_url(), branch)
            .with_secret(self.secret().map(str::to_string))
    }
}

// ============================================================================
// github
// ============================================================================

/// A GitHub Pages repository.
#[derive(Clone)]
pub struct GithubTarget {
    url: String,
    display_url: String,
    token: Option<String>,
}

impl GithubTarget {
    /// `url` is HTTPS or SSH. With a token, HTTPS URLs authenticate as
    /// `username` (default: the repository owner); SSH URLs ignore it.
    pub fn new(url: &str, username: Option<&str>, token: Option<String>) -> Result<Self, String> {
        let url = url.trim();
        let display_url = display_url(url)?;

        let token = token.filter(|t| !t.is_empty());
        let machine_url = match (&token, Url::parse(url)) {
            (Some(token), Ok(mut parsed)) if matches!(parsed.scheme(), "https" | "http") => {
                let user = username
                    .filter(|u| !u.trim().is_empty())
                    .map(str::to_string)
                    .or_else(|| repository_owner(url))
                    .unwrap_or_else(|| "x-access-token".to_string());
                parsed
                    .set_username(&user)
                    .and_then(|()| parsed.set_password(Some(token.as_str())))
                    .map_err(|()| format!("cannot add credentials to `{display_url}`"))?;
                parsed.to_string()
            }
            (Some(_), _) => {
                debug!("publish"; "token ignored for non-HTTPS url {}", display_url);
                url.to_string()
            }
            (None, _) => url.to_string(),
        };

        Ok(Self {
            url: machine_url,
            display_url: display_url.trim_end_matches(".git").to_string(),
            token,
        })
    }
}

impl RemoteTarget for GithubTarget {
    fn url(&self) -> &str {
        &self.url
    }

    fn display_url(&self) -> &str {
        &self.display_url
    }

    fn default_branch(&self) -> &str {
        GITHUB_PAGES_BRANCH
    }

    fn secret(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// First path segment of `https://github.com/<owner>/<repo>`.
fn repository_owner(url: &str) -> Option<String> {
    let path = extract_url_path(url)?;
    path.split('/')
        .next()
        .filter(|owner| !owner.is_empty())
        .map(str::to_string)
}

// ============================================================================
// plain git
// ============================================================================

/// Any git remote: URL, scp-style address or local path.
#[derive(Clone)]
pub struct GitTarget {
    url: String,
    display_url: String,
    default_branch: String,
    password: Option<String>,
}

impl GitTarget {
    pub fn new(url: &str, default_branch: &str) -> Result<Self, String> {
        let url = url.trim();
        let password = Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.password().map(str::to_string));
        Ok(Self {
            url: url.to_string(),
            display_url: display_url(url)?,
            default_branch: default_branch.trim().to_string(),
            password,
        })
    }
}

impl RemoteTarget for GitTarget {
    fn url(&self) -> &str {
        &self.url
    }

    fn display_url(&self) -> &str {
        &self.display_url
    }

    fn default_branch(&self) -> &str {
        &self.default_branch
    }

    fn secret(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Strip userinfo from URLs; scp-style addresses and paths are kept as is.
fn display_url(url: &str) -> Result<String, String> {
    if !url.contains("://") {
        return Ok(url.to_string());
    }
    let mut parsed = Url::parse(url).map_err(|e| format!("invalid url: {e}"))?;
    if parsed.cannot_be_a_base() {
        return Ok(url.to_string());
    }
    // Both only fail for cannot-be-a-base URLs, excluded above.
    let _ = parsed.set_username("");
    let _ = parsed.set_password(None);
    Ok(parsed.to_string())
}

// ============================================================================
// resolution
// ============================================================================

/// Build the target selected by `publish.provider`.
///
/// A blank URL is reported by [`PublishConfig::validate`]; here only
/// credential and URL syntax problems are collected.
pub fn resolve_target(config: &PublishConfig) -> Result<Box<dyn RemoteTarget>, ConfigDiagnostics> {
    let mut diag = ConfigDiagnostics::new();

    let target: Option<Box<dyn RemoteTarget>> = match config.provider {
        Provider::Github => {
            let github = &config.github;
            let token = read_token(github, &mut diag);
            match GithubTarget::new(&github.url, github.username.as_deref(), token) {
                Ok(target) => Some(Box::new(target)),
                Err(message) => {
                    diag.error(GithubPublishConfig::FIELDS.url, message);
                    None
                }
            }
        }
        Provider::Git => {
            let git = &config.git;
            if git.default_branch.trim().is_empty() && config.branch.trim().is_empty() {
                diag.error_with_hint(
                    GitPublishConfig::FIELDS.default_branch,
                    "must not be blank when `publish.branch` is not set",
                    "e.g. default_branch = \"main\"",
                );
            }
            match GitTarget::new(&git.url, &git.default_branch) {
                Ok(target) => Some(Box::new(target)),
                Err(message) => {
                    diag.error(GitPublishConfig::FIELDS.url, message);
                    None
                }
            }
        }
    };

    match target {
        Some(target) if diag.is_empty() => Ok(target),
        _ => Err(diag),
    }
}

/// Token from `token_path`, else from the `token_env` variable.
fn read_token(github: &GithubPublishConfig, diag: &mut ConfigDiagnostics) -> Option<String> {
    if let Some(path) = &github.token_path {
        // Missing files are reported by `GithubPublishConfig::validate`.
        if !path.is_file() {
            return None;
        }
        return match fs::read_to_string(path) {
            Ok(token) => Some(token.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) => {
                diag.error(
                    GithubPublishConfig::FIELDS.token_path,
                    format!("cannot read {}: {err}", path.display()),
                );
                None
            }
        };
    }

    let name = github.token_env.trim();
    if name.is_empty() {
        return None;
    }
    std::env::var(name)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
