//! Remote repository handle.

use crate::utils::exec::Cmd;
use std::fmt;

/// A remote branch to publish to.
///
/// `url` is what `git` connects to and may embed credentials;
/// `display_url` is what humans see and never does.
#[derive(Clone, PartialEq, Eq)]
pub struct Remote {
    pub url: String,
    pub display_url: String,
    pub branch: String,
    secret: Option<String>,
}

impl Remote {
    pub fn new(
        url: impl Into<String>,
        display_url: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            display_url: display_url.into(),
            branch: branch.into(),
            secret: None,
        }
    }

    /// Register a credential that must never appear in output.
    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret.filter(|s| !s.is_empty());
        self
    }

    /// Whether the URL carries a registered credential.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Fully qualified ref of the target branch.
    pub fn branch_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }

    /// Apply this remote's redactions to a command.
    pub fn redact(&self, cmd: Cmd) -> Cmd {
        let cmd = cmd.redact(&self.url, &self.display_url);
        match &self.secret {
            Some(secret) => cmd.redact(secret, "***"),
            None => cmd,
        }
    }
}

impl fmt::Debug for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Remote")
            .field("url", &self.display_url)
            .field("branch", &self.branch)
            .finish()
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_url, self.branch)
    }
}
