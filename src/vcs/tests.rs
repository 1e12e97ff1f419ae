//! End-to-end publishing against a local bare repository with the `git` CLI.
//!
//! Skipped when `git` is not installed.

use super::*;
use crate::config::test_parse_config;
use crate::publish::{PublishError, PublishOutcome, PublishSettings, PublishType, publish};
use std::{collections::BTreeMap, fs, process::Command};
use tempfile::TempDir;

const BRANCH: &str = "gh-pages";

struct Env {
    dir: TempDir,
    remote: PathBuf,
    runs: usize,
}

impl Env {
    /// `None` when `git` is unavailable.
    fn new() -> Option<Self> {
        if which::which("git").is_err() {
            eprintln!("git not found, skipping");
            return None;
        }
        let dir = TempDir::new().unwrap();
        let remote = dir.path().join("remote.git");
        git_ok(dir.path(), &["init", "--quiet", "--bare", remote.to_str().unwrap()]);
        Some(Self {
            dir,
            remote,
            runs: 0,
        })
    }

    /// Replace the site with `files`.
    fn build(&self, files: &[(&str, &str)]) -> PathBuf {
        let site = self.dir.path().join("public");
        if site.exists() {
            fs::remove_dir_all(&site).unwrap();
        }
        for (path, content) in files {
            let path = site.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        fs::create_dir_all(&site).unwrap();
        site
    }

    fn publish(
        &mut self,
        publish_type: PublishType,
        version: &str,
        site: &Path,
    ) -> Result<PublishOutcome, PublishError> {
        self.runs += 1;
        let mut config = test_parse_config("");
        config.site.dest = site.to_path_buf();
        config.site.version = version.to_string();
        config.publish.publish_type = publish_type.name().to_string();
        let settings = PublishSettings::validate(&config, BRANCH).unwrap();

        let url = self.remote.to_string_lossy().into_owned();
        let remote = Remote::new(url.clone(), url, &settings.branch);
        let tree_dir = self.dir.path().join(format!("tree-{}", self.runs));

        publish(&Git::new().unwrap(), &remote, &settings, &tree_dir)
    }

    /// Every file on the remote branch with its content.
    fn remote_files(&self) -> BTreeMap<String, String> {
        let names = git_read(&self.remote, &["ls-tree", "-r", "--name-only", BRANCH]);
        names
            .lines()
            .map(|name| {
                let content = git_read(&self.remote, &["show", &format!("{BRANCH}:{name}")]);
                (name.to_string(), content)
            })
            .collect()
    }

    fn commit_count(&self) -> usize {
        git_read(&self.remote, &["rev-list", "--count", BRANCH])
            .trim()
            .parse()
            .unwrap()
    }
}

fn git_ok(cwd: &Path, args: &[&str]) {
    let status = Command::new("git").current_dir(cwd).args(args).status().unwrap();
    assert!(status.success(), "git {args:?} failed");
}

fn git_read(git_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("--git-dir")
        .arg(git_dir)
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {args:?} failed");
    String::from_utf8(output.stdout).unwrap()
}

fn files(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn assert_published(outcome: Result<PublishOutcome, PublishError>, forced: bool) {
    match outcome {
        Ok(PublishOutcome::Published { commit, forced: f }) => {
            assert_eq!(commit.len(), 40);
            assert_eq!(f, forced);
        }
        other => panic!("expected a published commit, got {other:?}"),
    }
}

#[test]
fn test_clean_branch_content_equals_site() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[
        ("index.html", "home"),
        ("posts/a/index.html", "a"),
        (".nojekyll", ""),
    ]);

    assert_published(env.publish(PublishType::CleanBranch, "", &site), true);

    assert_eq!(
        env.remote_files(),
        files(&[
            (".nojekyll", ""),
            ("index.html", "home"),
            ("posts/a/index.html", "a"),
        ])
    );
}

#[test]
fn test_ignore_rules_do_not_drop_site_files() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[
        ("index.html", "home"),
        (".gitignore", "*.map\n"),
        ("app.js.map", "{}"),
    ]);

    env.publish(PublishType::CleanBranch, "", &site).unwrap();
    assert_eq!(
        env.remote_files(),
        files(&[
            (".gitignore", "*.map\n"),
            ("app.js.map", "{}"),
            ("index.html", "home"),
        ])
    );

    env.publish(PublishType::VersionedBranchWithLatest, "1.0", &site)
        .unwrap();
    let remote = env.remote_files();
    assert_eq!(remote.get("1.0/app.js.map").map(String::as_str), Some("{}"));
    assert_eq!(remote.get("latest/app.js.map").map(String::as_str), Some("{}"));
}

#[test]
fn test_clean_branch_discards_history() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "one"), ("old.html", "old")]);
    env.publish(PublishType::CleanBranch, "", &site).unwrap();

    let site = env.build(&[("index.html", "two")]);
    env.publish(PublishType::CleanBranch, "", &site).unwrap();

    assert_eq!(env.commit_count(), 1);
    assert_eq!(env.remote_files(), files(&[("index.html", "two")]));
}

#[test]
fn test_maintain_history_keeps_commits() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "one"), ("old.html", "old")]);
    assert_published(
        env.publish(PublishType::CleanBranchMaintainHistory, "", &site),
        false,
    );

    let site = env.build(&[("index.html", "two")]);
    assert_published(
        env.publish(PublishType::CleanBranchMaintainHistory, "", &site),
        false,
    );

    assert_eq!(env.commit_count(), 2);
    assert_eq!(env.remote_files(), files(&[("index.html", "two")]));
}

#[test]
fn test_versioned_keeps_previous_versions() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "v1")]);
    env.publish(PublishType::VersionedBranch, "1.0", &site).unwrap();

    let site = env.build(&[("index.html", "v2")]);
    env.publish(PublishType::VersionedBranch, "2.0", &site).unwrap();

    assert_eq!(
        env.remote_files(),
        files(&[("1.0/index.html", "v1"), ("2.0/index.html", "v2")])
    );
    assert_eq!(env.commit_count(), 2);
}

#[test]
fn test_versioned_same_version_fully_replaced() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "draft"), ("removed.html", "gone soon")]);
    env.publish(PublishType::VersionedBranch, "1.0", &site).unwrap();

    let site = env.build(&[("index.html", "final")]);
    env.publish(PublishType::VersionedBranch, "1.0", &site).unwrap();

    assert_eq!(env.remote_files(), files(&[("1.0/index.html", "final")]));
}

#[test]
fn test_versioned_with_latest() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "v1"), ("only-in-v1.html", "x")]);
    assert_published(
        env.publish(PublishType::VersionedBranchWithLatest, "1.0", &site),
        true,
    );

    let site = env.build(&[("index.html", "v2")]);
    assert_published(
        env.publish(PublishType::VersionedBranchWithLatest, "2.0", &site),
        true,
    );

    assert_eq!(
        env.remote_files(),
        files(&[
            ("1.0/index.html", "v1"),
            ("1.0/only-in-v1.html", "x"),
            ("2.0/index.html", "v2"),
            ("latest/index.html", "v2"),
        ])
    );
}

#[test]
fn test_first_publish_to_missing_branch() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "v1")]);

    assert_published(env.publish(PublishType::VersionedBranch, "1.0", &site), false);

    assert_eq!(env.remote_files(), files(&[("1.0/index.html", "v1")]));
}

#[test]
fn test_unchanged_publish_is_skipped() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "same")]);
    env.publish(PublishType::CleanBranchMaintainHistory, "", &site)
        .unwrap();

    let outcome = env
        .publish(PublishType::CleanBranchMaintainHistory, "", &site)
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Unchanged);
    assert_eq!(env.commit_count(), 1);
}

#[test]
fn test_push_to_missing_remote_fails() {
    let Some(mut env) = Env::new() else { return };
    let site = env.build(&[("index.html", "home")]);
    env.remote = env.dir.path().join("does-not-exist.git");

    let err = env.publish(PublishType::CleanBranch, "", &site).unwrap_err();

    assert!(matches!(err, PublishError::Push { .. }), "{err:?}");
}

#[test]
fn test_commit_without_changes() {
    let Some(env) = Env::new() else { return };
    let remote = Remote::new(env.remote.to_string_lossy(), env.remote.to_string_lossy(), BRANCH);
    let git = Git::new().unwrap();
    let mut tree = git.init(&remote, &env.dir.path().join("tree")).unwrap();
    let identity = CommitIdentity {
        name: "sitepub".into(),
        email: "sitepub@sitepub".into(),
    };

    fs::write(tree.root().join("index.html"), "home").unwrap();
    assert!(matches!(
        tree.commit(&identity, "first").unwrap(),
        CommitOutcome::Committed(_)
    ));
    assert_eq!(
        tree.commit(&identity, "second").unwrap(),
        CommitOutcome::NothingToCommit
    );
    assert!(tree.commit(&identity, "  ").is_err());
}
