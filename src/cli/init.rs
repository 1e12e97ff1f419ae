//! `sitepub init`: write a default configuration file.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::fs;

/// Generate sitepub.toml content with a header.
pub fn generate_config_template() -> Result<String> {
    let body = toml::to_string_pretty(&SiteConfig::default())
        .context("Failed to serialize default configuration")?;

    let mut out = String::new();
    out.push_str(&format!(
        "# sitepub configuration file (v{})\n",
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str("#\n");
    out.push_str("# publish.type: CleanBranch | CleanBranchMaintainHistory |\n");
    out.push_str("#               VersionedBranch | VersionedBranchWithLatest\n");
    out.push_str("# publish.branch: blank = provider default (github: gh-pages)\n\n");
    out.push_str(&body);
    Ok(out)
}

/// Write the template to `config.config_path`, or print it when `dry_run`.
///
/// Never overwrites an existing file.
pub fn init_config(config: &SiteConfig, dry_run: bool) -> Result<()> {
    let content = generate_config_template()?;
    if dry_run {
        print!("{content}");
        return Ok(());
    }

    let path = &config.config_path;
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    log!("init"; "wrote {}", config.root_relative(path).display());
    Ok(())
}
