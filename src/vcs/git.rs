//! `git` command-line backend.
//!
//! Repository creation and `HEAD` introspection go through `gix`; clone,
//! commit and push shell out to `git` so transports, credential helpers and
//! SSH configuration behave exactly as they do for the user.

use super::{CommitIdentity, CommitOutcome, Remote, Vcs, WorkingTree};
use crate::{
    debug, log,
    utils::exec::{Cmd, FilterRule, SILENT_FILTER},
};
use anyhow::{Context, Result, anyhow, bail};
use std::{
    fs,
    io::IsTerminal,
    path::{Path, PathBuf},
};

/// Progress chatter that is not worth logging.
const GIT_FILTER: FilterRule = FilterRule::new(&[
    "hint:",
    "Cloning into",
    "To ",
    "Everything up-to-date",
    "remote: Counting",
    "remote: Compressing",
    "remote: Total",
    "warning: You appear to have cloned an empty repository",
]);

/// The `git` CLI facade.
#[derive(Debug)]
pub struct Git {
    /// Attached to a terminal: let `git push` prompt for credentials.
    interactive: bool,
}

impl Git {
    /// Locate `git` on `PATH`.
    pub fn new() -> Result<Self> {
        which::which("git").map_err(|_| anyhow!("`git` not found in PATH"))?;
        Ok(Self {
            interactive: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
        })
    }

    fn tree(&self, remote: &Remote, root: &Path) -> GitTree {
        GitTree {
            root: root.to_path_buf(),
            remote: remote.clone(),
            interactive: self.interactive,
        }
    }

    /// Whether `remote.branch` exists on the remote.
    fn remote_has_branch(&self, remote: &Remote, cwd: &Path) -> Result<bool> {
        let heads = remote
            .redact(git(cwd, false))
            .args(["ls-remote", "--heads", &remote.url, &remote.branch_ref()])
            .filter(&SILENT_FILTER)
            .read()?;
        Ok(!heads.is_empty())
    }
}

impl Vcs for Git {
    type Tree = GitTree;

    fn init(&self, remote: &Remote, dir: &Path) -> Result<GitTree> {
        fs::create_dir_all(dir)?;
        gix::init(dir).with_context(|| format!("Failed to init repository in {}", dir.display()))?;

        git(dir, false)
            .args(["symbolic-ref", "HEAD", &remote.branch_ref()])
            .run()?;

        debug!("git"; "initialized {} on {}", dir.display(), remote.branch);
        Ok(self.tree(remote, dir))
    }

    fn clone_branch(&self, remote: &Remote, dir: &Path) -> Result<GitTree> {
        let parent = dir
            .parent()
            .ok_or_else(|| anyhow!("Invalid working tree path: {}", dir.display()))?;
        fs::create_dir_all(parent)?;

        if !self.remote_has_branch(remote, parent)? {
            log!("git"; "branch `{}` not found on {}, starting it", remote.branch, remote.display_url);
            return self.init(remote, dir);
        }

        log!("git"; "cloning {}", remote);
        remote
            .redact(git(parent, false))
            .args(["clone", "--quiet", "--no-tags", "--single-branch", "--branch"])
            .arg(&remote.branch)
            .arg(&remote.url)
            .arg(dir)
            .filter(&GIT_FILTER)
            .run()?;

        Ok(self.tree(remote, dir))
    }
}

/// A working tree managed through the `git` CLI.
#[derive(Debug)]
pub struct GitTree {
    root: PathBuf,
    remote: Remote,
    interactive: bool,
}

impl GitTree {
    /// Id of the commit `HEAD` points at.
    fn head_id(&self) -> Result<String> {
        let repo = gix::open(&self.root)?;
        Ok(repo.head_id()?.detach().to_string())
    }
}

impl WorkingTree for GitTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn commit(&mut self, identity: &CommitIdentity, message: &str) -> Result<CommitOutcome> {
        if message.trim().is_empty() {
            bail!("Commit message cannot be empty");
        }

        // Ignore rules (a `.gitignore` in the site, `core.excludesFile`)
        // must not drop published files.
        git(&self.root, false)
            .args(["add", "--all", "--force"])
            .run()?;

        let status = git(&self.root, false)
            .args(["status", "--porcelain"])
            .filter(&SILENT_FILTER)
            .read()?;
        if status.is_empty() {
            return Ok(CommitOutcome::NothingToCommit);
        }

        git(&self.root, false)
            .arg("-c")
            .arg(format!("user.name={}", identity.name))
            .arg("-c")
            .arg(format!("user.email={}", identity.email))
            .args(["-c", "commit.gpgsign=false", "commit", "--quiet", "-m", message])
            .filter(&GIT_FILTER)
            .run()?;

        let id = self.head_id()?;
        log!("git"; "commit {id}");
        Ok(CommitOutcome::Committed(id))
    }

    fn push(&mut self, force: bool) -> Result<()> {
        let refspec = format!("HEAD:{}", self.remote.branch_ref());
        log!("git"; "push{} {}", if force { " --force" } else { "" }, self.remote);

        // A credential in the URL means no prompt is needed, and git output
        // must stay captured so it can be redacted.
        let interactive = self.interactive && !self.remote.has_secret();

        let mut cmd = self
            .remote
            .redact(git(&self.root, interactive))
            .arg("push");
        if force {
            cmd = cmd.arg("--force");
        }
        cmd.args([self.remote.url.as_str(), refspec.as_str()])
            .inherit_stdio(interactive)
            .filter(&GIT_FILTER)
            .run()?;
        Ok(())
    }
}

/// `git` command rooted at `cwd`.
///
/// Non-interactive commands must fail instead of waiting on a prompt
/// nobody will answer.
fn git(cwd: &Path, interactive: bool) -> Cmd {
    let cmd = Cmd::new("git").cwd(cwd);
    if interactive {
        cmd
    } else {
        cmd.envs([("GIT_TERMINAL_PROMPT", "0")])
    }
}
