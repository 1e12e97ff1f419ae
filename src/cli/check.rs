//! `sitepub check`: validate configuration and show what `publish` would do.

use crate::{
    config::SiteConfig,
    log,
    publish::{self, Acquire, PublishSettings, RemoteTarget},
};
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn check_config(config: &SiteConfig) -> Result<()> {
    let (target, settings) = publish::prepare(config)?;

    log!("check"; "configuration is valid");
    for (key, value) in plan(config, target.as_ref(), &settings) {
        println!("  {:<10} {}", key.dimmed(), value);
    }
    Ok(())
}

/// Effective publish plan as `(label, value)` lines.
fn plan(
    config: &SiteConfig,
    target: &dyn RemoteTarget,
    settings: &PublishSettings,
) -> Vec<(&'static str, String)> {
    let strategy = settings.publish_type.strategy();
    let mut lines = vec![
        ("remote", target.display_url().to_string()),
        ("branch", settings.branch.clone()),
        ("type", settings.publish_type.to_string()),
        (
            "history",
            match strategy.acquire() {
                Acquire::Init => "discarded (fresh branch)".to_string(),
                Acquire::Clone => "kept (cloned)".to_string(),
            },
        ),
        (
            "push",
            if strategy.force_push() {
                "force".to_string()
            } else {
                "fast-forward".to_string()
            },
        ),
        ("source", config.root_relative(&settings.source).display().to_string()),
    ];

    let mut dirs = Vec::new();
    if settings.publish_type.is_versioned() {
        dirs.push(format!("{}/", settings.version));
    }
    if settings.publish_type == publish::PublishType::VersionedBranchWithLatest {
        dirs.push(format!("{}/", settings.latest_dir));
    }
    lines.push((
        "into",
        if dirs.is_empty() {
            "/".to_string()
        } else {
            dirs.join(", ")
        },
    ));

    lines.push((
        "author",
        format!("{} <{}>", settings.identity.name, settings.identity.email),
    ));
    lines
}
