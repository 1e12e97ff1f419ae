//! sitepub - publish a built static site to a git branch.

mod cli;
mod config;
mod logger;
mod publish;
mod utils;
mod vcs;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { dry } => cli::init::init_config(&config, *dry),
        Commands::Publish { .. } => cli::publish::publish_site(&config),
        Commands::Check { .. } => cli::check::check_config(&config),
    }
}
