// ABOUTME: Repository handle shared by every query, plus the crate error type
// The handle is immutable after discovery and safe to share across threads

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::changes::ChangeSet;
use super::executor::{CommandOutput, CommandRunner, GitCommand};
use super::overrides::TrackedOverrides;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("No git project root was found, starting at {}", start.display())]
    NotARepository { start: PathBuf },
    #[error("Failed to resolve path {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` failed: {output}")]
    CommandFailed { command: String, output: String },
    #[error("Filesystem watcher error: {0}")]
    Watch(#[from] notify::Error),
    #[error("Branch notification receiver was dropped")]
    NotifyClosed,
    #[error("Background git query panicked or was cancelled: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Immutable view of a discovered working tree.
///
/// Built by [`Repository::discover`]; the root, default upstream and override
/// patterns are fixed for the lifetime of the value.
pub struct Repository {
    pub(crate) root: PathBuf,
    pub(crate) default_upstream: String,
    pub(crate) overrides: TrackedOverrides,
    pub(crate) runner: Arc<dyn CommandRunner>,
    pub(crate) settle_interval: Duration,
}

impl Repository {
    /// Canonical path of the directory holding `.git`
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the git metadata marker inside the root
    pub fn git_dir(&self) -> PathBuf {
        self.root.join(super::GIT_MARKER)
    }

    /// Baseline reference resolved at construction, possibly empty
    pub fn default_upstream(&self) -> &str {
        &self.default_upstream
    }

    pub fn overrides(&self) -> &TrackedOverrides {
        &self.overrides
    }

    pub fn settle_interval(&self) -> Duration {
        self.settle_interval
    }

    /// Run git in the root, returning the raw output only when it exits zero
    pub(crate) fn git<I, S>(&self, args: I) -> Result<Vec<u8>, RepoError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = GitCommand::new(args).in_dir(&self.root);
        let output = self.run(&command)?;
        if output.success {
            Ok(output.output)
        } else {
            Err(RepoError::CommandFailed {
                command: command.to_string(),
                output: output.text().trim().to_string(),
            })
        }
    }

    /// Run git in the root without interpreting the exit status
    pub(crate) fn run(&self, command: &GitCommand) -> Result<CommandOutput, RepoError> {
        self.runner.run(command).map_err(|source| RepoError::Spawn {
            command: command.to_string(),
            source,
        })
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("default_upstream", &self.default_upstream)
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

/// Read-only query surface over a working tree.
///
/// Tooling should depend on this trait rather than [`Repository`] so it can
/// substitute a fake in its own tests.
pub trait WorkingTree: Send + Sync {
    fn root(&self) -> &Path;
    fn default_upstream(&self) -> &str;
    fn current_branch(&self) -> Result<String, RepoError>;
    fn head_sha(&self) -> Result<String, RepoError>;
    fn working_hash(&self) -> Result<String, RepoError>;
    fn changed_paths(&self, since_ref: &str) -> ChangeSet;
    fn is_tracked(&self, path: &Path) -> bool;
    fn is_ignored(&self, path: &Path) -> bool;
}

impl WorkingTree for Repository {
    fn root(&self) -> &Path {
        Self::root(self)
    }

    fn default_upstream(&self) -> &str {
        Self::default_upstream(self)
    }

    fn current_branch(&self) -> Result<String, RepoError> {
        Self::current_branch(self)
    }

    fn head_sha(&self) -> Result<String, RepoError> {
        Self::head_sha(self)
    }

    fn working_hash(&self) -> Result<String, RepoError> {
        Self::working_hash(self)
    }

    fn changed_paths(&self, since_ref: &str) -> ChangeSet {
        Self::changed_paths(self, since_ref)
    }

    fn is_tracked(&self, path: &Path) -> bool {
        Self::is_tracked(self, path)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        Self::is_ignored(self, path)
    }
}
