//! Site configuration management for `sitepub.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── publish    # [publish], [publish.commit], [publish.github], [publish.git]
//! │   └── site       # [site]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

pub use util::{extract_url_path, find_config_file};

pub use section::{
    CommitConfig, EmptyCommitPolicy, GitPublishConfig, GithubPublishConfig, Provider,
    PublishConfig, SiteSectionConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, PublishArgs},
    log,
    utils::path::{expand_path, normalize_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::IsTerminal,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "sitepub.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitepub.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Built site settings
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Publication settings
    #[serde(default)]
    pub publish: PublishConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find config file.
    /// The project root is determined by the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if cli.is_init() {
            let mut config = Self::default();
            config.config_path = cwd.join(&cli.config);
            config.set_root(&cwd);
            return Ok(config);
        }

        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;
        let mut config = Self::from_path(&config_path)?;

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path;
        config.finalize(&root, cli);
        Ok(config)
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, root: &Path, cli: &Cli) {
        self.apply_command_options(cli);
        self.normalize_paths(root);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
            if !Self::prompt_continue()? {
                return Err(ConfigError::UnknownFields.into());
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    ///
    /// Without a terminal there is nobody to ask, so the answer is no.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        if !io::stdin().is_terminal() {
            return Ok(false);
        }

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        Ok(input == "y" || input == "yes")
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Publish { args } | Commands::Check { args } => {
                self.apply_publish_args(args);
            }
            Commands::Init { .. } => {}
        }
    }

    /// Apply publish arguments from CLI.
    pub fn apply_publish_args(&mut self, args: &PublishArgs) {
        crate::logger::set_verbose(args.verbose);

        if let Some(publish_type) = args.publish_type {
            self.publish.publish_type = publish_type.name().to_string();
        }
        Self::update_option(&mut self.publish.branch, args.branch.as_ref());
        Self::update_option(&mut self.publish.commit.message, args.message.as_ref());
        Self::update_option(&mut self.publish.empty_commit, args.empty_commit.as_ref());
        Self::update_option(&mut self.site.version, args.site_version.as_ref());
        Self::update_option(&mut self.site.dest, args.dest.as_ref());
        if args.keep_work_dir {
            self.publish.keep_work_dir = true;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.set_root(&root);
        self.config_path = normalize_path(&self.config_path);

        self.site.dest = normalize_path(&root.join(&self.site.dest));

        if let Some(work_dir) = self.publish.work_dir.take() {
            self.publish.work_dir = Some(expand_path(&work_dir, &root));
        }
        if let Some(token_path) = self.publish.github.token_path.take() {
            self.publish.github.token_path = Some(expand_path(&token_path, &root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate section-level settings, collecting every error into `diag`.
    ///
    /// Field rules of the publish strategy itself (blank values, email
    /// format, publish type) are checked by `PublishSettings::validate`.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let dest = &self.site.dest;
        if !dest.exists() {
            diag.error_with_hint(
                SiteSectionConfig::FIELDS.dest,
                format!("destination directory not found: {}", dest.display()),
                "build the site first, or point `site.dest` at its output",
            );
        } else if !dest.is_dir() {
            diag.error(
                SiteSectionConfig::FIELDS.dest,
                format!("destination is not a directory: {}", dest.display()),
            );
        }

        self.publish.validate(diag);
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking if there are unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PublishArgs;
    use crate::publish::PublishType;

    fn publish_args() -> PublishArgs {
        PublishArgs {
            publish_type: None,
            branch: None,
            site_version: None,
            dest: None,
            message: None,
            empty_commit: None,
            keep_work_dir: false,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result = SiteConfig::parse_with_ignored("[publish\ntype = \"CleanBranch\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_set_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/custom/path"));
        assert_eq!(config.root, Path::new("/custom/path"));
        assert_eq!(
            config.root_relative("/custom/path/public"),
            PathBuf::from("public")
        );
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\nversion = \"1.0\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.site.version, "1.0");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[site]\nversion = \"1.0\"\n[publish]\ntype = \"VersionedBranch\"";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_apply_publish_args_overrides() {
        let mut config = SiteConfig::default();
        let args = PublishArgs {
            publish_type: Some(PublishType::VersionedBranch),
            branch: Some("pages".into()),
            site_version: Some("3.1".into()),
            dest: Some(PathBuf::from("out")),
            message: Some("release 3.1".into()),
            empty_commit: Some(EmptyCommitPolicy::Fail),
            keep_work_dir: true,
            verbose: false,
        };
        config.apply_publish_args(&args);

        assert_eq!(config.publish.publish_type, "VersionedBranch");
        assert_eq!(config.publish.branch, "pages");
        assert_eq!(config.publish.commit.message, "release 3.1");
        assert_eq!(config.publish.empty_commit, EmptyCommitPolicy::Fail);
        assert!(config.publish.keep_work_dir);
        assert_eq!(config.site.version, "3.1");
        assert_eq!(config.site.dest, PathBuf::from("out"));
    }

    #[test]
    fn test_apply_publish_args_keeps_config_values() {
        let mut config = test_parse_config("[publish]\nbranch = \"gh-pages\"\nkeep_work_dir = true");
        config.apply_publish_args(&publish_args());

        assert_eq!(config.publish.branch, "gh-pages");
        assert_eq!(config.publish.publish_type, "CleanBranch");
        assert!(config.publish.keep_work_dir);
    }

    #[test]
    fn test_normalize_paths_relative_to_root() {
        let root = tempfile::TempDir::new().unwrap();
        let mut config = test_parse_config(
            "[site]\ndest = \"public\"\n[publish]\nwork_dir = \".sitepub\"\n[publish.github]\ntoken_path = \"secrets/token\"",
        );
        config.normalize_paths(root.path());

        let root = normalize_path(root.path());
        assert_eq!(config.site.dest, root.join("public"));
        assert_eq!(config.publish.work_dir, Some(root.join(".sitepub")));
        assert_eq!(
            config.publish.github.token_path,
            Some(root.join("secrets/token"))
        );
    }

    #[test]
    fn test_validate_missing_dest() {
        let root = tempfile::TempDir::new().unwrap();
        let mut config = test_parse_config(
            "[publish.github]\nurl = \"https://github.com/user/repo\"",
        );
        config.normalize_paths(root.path());

        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.has_error_for(SiteSectionConfig::FIELDS.dest));

        std::fs::create_dir(root.path().join("public")).unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
