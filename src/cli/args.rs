//! Command-line interface definitions.

use crate::config::{CONFIG_FILE, EmptyCommitPolicy};
use crate::publish::PublishType;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Publish a built static site to a git branch
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitepub.toml)
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default sitepub.toml
    #[command(visible_alias = "i")]
    Init {
        /// Print the config template instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Publish the built site to the configured branch
    #[command(visible_alias = "p")]
    Publish {
        #[command(flatten)]
        args: PublishArgs,
    },

    /// Validate configuration and print the publish plan
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: PublishArgs,
    },
}

/// Shared arguments for Publish and Check commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PublishArgs {
    /// Publication strategy
    #[arg(short = 't', long = "type", value_enum)]
    pub publish_type: Option<PublishType>,

    /// Target branch (default: provider's default branch)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Site version, used as subdirectory name by versioned types
    #[arg(long = "site-version")]
    pub site_version: Option<String>,

    /// Built site directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dest: Option<PathBuf>,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// What to do when nothing changed
    #[arg(long = "empty-commit", value_enum)]
    pub empty_commit: Option<EmptyCommitPolicy>,

    /// Keep the temporary working tree for inspection
    #[arg(short, long)]
    pub keep_work_dir: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
