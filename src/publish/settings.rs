//! Validated, immutable publish settings.

use super::PublishType;
use crate::{
    config::{
        CommitConfig, ConfigDiagnostics, EmptyCommitPolicy, PublishConfig, SiteConfig,
        SiteSectionConfig,
    },
    utils::path::is_plain_component,
    vcs::CommitIdentity,
};
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};

/// `local@domain`, where domain labels are letters, digits and hyphens.
/// A dotless domain (`sitepub@sitepub`) is accepted.
static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .unwrap()
});

/// Everything one publish needs, checked up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub publish_type: PublishType,
    /// Effective branch (default substituted).
    pub branch: String,
    pub identity: CommitIdentity,
    pub message: String,
    pub latest_dir: String,
    /// Site version; only meaningful for versioned types.
    pub version: String,
    /// Built site to publish.
    pub source: PathBuf,
    pub empty_commit: EmptyCommitPolicy,
}

impl PublishSettings {
    /// Build settings from `config`, substituting `default_branch` when
    /// `publish.branch` is blank.
    ///
    /// Every problem is collected; nothing is touched on disk or network.
    pub fn validate(config: &SiteConfig, default_branch: &str) -> Result<Self, ConfigDiagnostics> {
        let publish = &config.publish;
        let commit = &publish.commit;
        let mut diag = ConfigDiagnostics::new();

        if commit.username.trim().is_empty() {
            diag.error(CommitConfig::FIELDS.username, "must not be blank");
        }
        if commit.email.trim().is_empty() {
            diag.error(CommitConfig::FIELDS.email, "must not be blank");
        } else if !RE_EMAIL.is_match(commit.email.trim()) {
            diag.error_with_hint(
                CommitConfig::FIELDS.email,
                format!("`{}` is not a valid email address", commit.email),
                "expected `name@domain`",
            );
        }
        if commit.message.trim().is_empty() {
            diag.error(CommitConfig::FIELDS.message, "must not be blank");
        }

        let branch = effective_branch(&publish.branch, default_branch);
        check_branch(branch, &mut diag);

        let publish_type = parse_publish_type(publish, &mut diag);

        if !is_plain_component(&publish.latest_dir) {
            diag.error_with_hint(
                PublishConfig::FIELDS.latest_dir,
                format!("`{}` is not a valid directory name", publish.latest_dir),
                "use a single directory name, e.g. \"latest\"",
            );
        }

        let version = config.site.version.trim();
        if publish_type.is_some_and(PublishType::is_versioned) {
            if version.is_empty() {
                diag.error_with_hint(
                    SiteSectionConfig::FIELDS.version,
                    "must be set for versioned publish types",
                    "set `site.version` or pass `--site-version`",
                );
            } else if !is_plain_component(version) {
                diag.error(
                    SiteSectionConfig::FIELDS.version,
                    format!("`{version}` cannot be used as a directory name"),
                );
            } else if publish_type == Some(PublishType::VersionedBranchWithLatest)
                && version.eq_ignore_ascii_case(publish.latest_dir.trim())
            {
                diag.error(
                    SiteSectionConfig::FIELDS.version,
                    format!("`{version}` collides with `publish.latest_dir`"),
                );
            }
        }

        diag.into_result()?;
        let Some(publish_type) = publish_type else {
            unreachable!("an unknown publish type is reported as a diagnostic");
        };

        Ok(Self {
            publish_type,
            branch: branch.to_string(),
            identity: CommitIdentity {
                name: commit.username.trim().to_string(),
                email: commit.email.trim().to_string(),
            },
            message: commit.message.clone(),
            latest_dir: publish.latest_dir.trim().to_string(),
            version: version.to_string(),
            source: config.site.dest.clone(),
            empty_commit: publish.empty_commit,
        })
    }

    /// Whether pushing overwrites remote history.
    pub fn force_push(&self) -> bool {
        self.publish_type.strategy().force_push()
    }
}

/// `configured`, or `default` when blank.
fn effective_branch<'a>(configured: &'a str, default: &'a str) -> &'a str {
    let configured = configured.trim();
    if configured.is_empty() {
        default.trim()
    } else {
        configured
    }
}

fn check_branch(branch: &str, diag: &mut ConfigDiagnostics) {
    let field = PublishConfig::FIELDS.branch;
    if branch.is_empty() {
        diag.error(field, "must not be blank");
    } else if branch.starts_with('-') || branch.contains(char::is_whitespace) {
        diag.error(field, format!("`{branch}` is not a valid branch name"));
    }
}

fn parse_publish_type(publish: &PublishConfig, diag: &mut ConfigDiagnostics) -> Option<PublishType> {
    let field = PublishConfig::FIELDS.publish_type;
    if publish.publish_type.trim().is_empty() {
        diag.error(field, "must not be blank");
        return None;
    }

    let parsed = PublishType::parse(&publish.publish_type);
    if parsed.is_none() {
        let names: Vec<_> = PublishType::ALL.iter().map(|t| t.name()).collect();
        diag.error_with_hint(
            field,
            format!("unknown publish type `{}`", publish.publish_type),
            format!("expected one of: {}", names.join(", ")),
        );
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldPath, test_parse_config};

    fn config(content: &str) -> SiteConfig {
        let mut config = test_parse_config(content);
        config.site.dest = PathBuf::from("/site/public");
        config
    }

    fn errors_for(content: &str) -> ConfigDiagnostics {
        PublishSettings::validate(&config(content), "gh-pages").unwrap_err()
    }

    fn assert_error(content: &str, field: FieldPath) {
        let diag = errors_for(content);
        assert!(diag.has_error_for(field), "expected error for {field}, got {diag}");
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = PublishSettings::validate(&config(""), "gh-pages").unwrap();

        assert_eq!(settings.publish_type, PublishType::CleanBranch);
        assert_eq!(settings.branch, "gh-pages");
        assert_eq!(settings.identity.name, "sitepub");
        assert_eq!(settings.identity.email, "sitepub@sitepub");
        assert_eq!(settings.message, "Deploy to GitHub Pages from sitepub.");
        assert_eq!(settings.source, PathBuf::from("/site/public"));
        assert_eq!(settings.empty_commit, EmptyCommitPolicy::Skip);
        assert!(settings.force_push());
    }

    #[test]
    fn test_blank_branch_uses_default() {
        let settings = PublishSettings::validate(&config("[publish]\nbranch = \"  \""), "pages").unwrap();
        assert_eq!(settings.branch, "pages");

        let settings =
            PublishSettings::validate(&config("[publish]\nbranch = \"docs\""), "pages").unwrap();
        assert_eq!(settings.branch, "docs");
    }

    #[test]
    fn test_blank_branch_without_default() {
        let diag = PublishSettings::validate(&config(""), "").unwrap_err();
        assert!(diag.has_error_for(PublishConfig::FIELDS.branch));
    }

    #[test]
    fn test_invalid_branch_name() {
        assert_error("[publish]\nbranch = \"--force\"", PublishConfig::FIELDS.branch);
        assert_error("[publish]\nbranch = \"gh pages\"", PublishConfig::FIELDS.branch);
    }

    #[test]
    fn test_email_formats() {
        for email in ["bot@example.com", "sitepub@sitepub", "first.last+tag@sub.example-host.org"] {
            let content = format!("[publish.commit]\nemail = \"{email}\"");
            assert!(
                PublishSettings::validate(&config(&content), "gh-pages").is_ok(),
                "{email} should be accepted"
            );
        }

        for email in ["not-an-email", "a@", "@b.com", "a@b..com", "a@-b.com", "a b@c.com"] {
            let content = format!("[publish.commit]\nemail = \"{email}\"");
            assert_error(&content, CommitConfig::FIELDS.email);
        }
    }

    #[test]
    fn test_blank_commit_fields() {
        let diag = errors_for("[publish.commit]\nusername = \"\"\nemail = \" \"\nmessage = \"\"");
        assert!(diag.has_error_for(CommitConfig::FIELDS.username));
        assert!(diag.has_error_for(CommitConfig::FIELDS.email));
        assert!(diag.has_error_for(CommitConfig::FIELDS.message));
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_publish_type_names() {
        let settings =
            PublishSettings::validate(&config("[publish]\ntype = \"clean-branch-maintain-history\""), "gh-pages")
                .unwrap();
        assert_eq!(settings.publish_type, PublishType::CleanBranchMaintainHistory);
        assert!(!settings.force_push());

        assert_error("[publish]\ntype = \"\"", PublishConfig::FIELDS.publish_type);
        assert_error("[publish]\ntype = \"Rsync\"", PublishConfig::FIELDS.publish_type);
    }

    #[test]
    fn test_versioned_requires_version() {
        assert_error(
            "[publish]\ntype = \"VersionedBranch\"",
            SiteSectionConfig::FIELDS.version,
        );
        assert_error(
            "[site]\nversion = \"../1.0\"\n[publish]\ntype = \"VersionedBranch\"",
            SiteSectionConfig::FIELDS.version,
        );
        assert_error(
            "[site]\nversion = \"latest\"\n[publish]\ntype = \"VersionedBranchWithLatest\"",
            SiteSectionConfig::FIELDS.version,
        );

        let settings = PublishSettings::validate(
            &config("[site]\nversion = \" 1.0 \"\n[publish]\ntype = \"VersionedBranch\""),
            "gh-pages",
        )
        .unwrap();
        assert_eq!(settings.version, "1.0");
    }

    #[test]
    fn test_version_collides_with_latest_ignoring_case() {
        assert_error(
            "[site]\nversion = \"Latest\"\n[publish]\ntype = \"VersionedBranchWithLatest\"",
            SiteSectionConfig::FIELDS.version,
        );
        assert_error(
            "[site]\nversion = \"v1\"\n[publish]\ntype = \"VersionedBranchWithLatest\"\nlatest_dir = \"V1\"",
            SiteSectionConfig::FIELDS.version,
        );
    }

    #[test]
    fn test_version_ignored_for_clean_types() {
        assert!(PublishSettings::validate(&config("[site]\nversion = \"\""), "gh-pages").is_ok());
    }

    #[test]
    fn test_latest_dir_must_be_plain() {
        for latest in ["", "a/b", "..", ".git"] {
            let content = format!("[publish]\nlatest_dir = \"{latest}\"");
            assert_error(&content, PublishConfig::FIELDS.latest_dir);
        }
    }

    #[test]
    fn test_all_errors_reported_together() {
        let diag = errors_for(
            "[publish]\ntype = \"VersionedBranch\"\nlatest_dir = \"\"\n[publish.commit]\nemail = \"nope\"",
        );
        assert!(diag.has_error_for(CommitConfig::FIELDS.email));
        assert!(diag.has_error_for(PublishConfig::FIELDS.latest_dir));
        assert!(diag.has_error_for(SiteSectionConfig::FIELDS.version));
        assert_eq!(diag.len(), 3);
    }
}
