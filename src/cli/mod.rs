// ABOUTME: CLI argument parsing and repository setup for the repostate probe binary
//
// Provides command-line access to every repository query:
// - Locating the root and default upstream
// - Branch, HEAD and working-hash lookups
// - Change sets and tracked/ignored classification
// - Streaming branch changes (watch)

pub mod query;
pub mod watch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::config::RepoConfig;
use crate::git::Repository;

/// Inspect the state of a git working tree
#[derive(Parser)]
#[command(name = "repostate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Any path inside the repository
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Log format written to stderr
    #[arg(long, global = true, default_value = "text")]
    pub log_format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the repository root
    Root,

    /// Print the checked-out branch
    Branch,

    /// Print the commit HEAD points at
    Sha,

    /// Print the default upstream reference
    Upstream,

    /// Print the working-tree fingerprint
    Hash,

    /// List files changed since a reference
    Changed(ChangedArgs),

    /// Report whether each path is treated as tracked
    Tracked(PathsArgs),

    /// Report whether each path is ignored by git
    Ignored(PathsArgs),

    /// Print the current branch, then every change until interrupted
    Watch,
}

/// Arguments for the changed command
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ChangedArgs {
    /// Reference to diff against (defaults to the default upstream)
    #[arg(long)]
    pub since: Option<String>,
}

/// Arguments for the tracked and ignored commands
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct PathsArgs {
    /// Paths to classify
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Build the effective configuration: file (if any), then the environment
pub fn load_config(path: Option<&Path>) -> Result<RepoConfig> {
    let config = match path {
        Some(path) => RepoConfig::load(path)?,
        None => RepoConfig::default(),
    };
    Ok(config.apply_env())
}

/// Resolve configuration, check git is installed and discover the repository
pub fn open_repository(cli: &Cli) -> Result<Arc<Repository>> {
    let config = load_config(cli.config.as_deref())?;

    let git = which::which(&config.git_binary)
        .with_context(|| format!("Could not find git executable '{}'", config.git_binary))?;
    debug!("Using git at {}", git.display());

    let repo = Repository::discover(&cli.repo, &config)
        .with_context(|| format!("Failed to open repository at {}", cli.repo.display()))?;
    Ok(Arc::new(repo))
}
