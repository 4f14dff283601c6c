// ABOUTME: Repository discovery by walking parent directories for the .git marker

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::executor::{CommandRunner, GitCli};
use super::overrides::TrackedOverrides;
use super::repository::{RepoError, Repository};
use super::upstream::resolve_default_upstream;
use super::GIT_MARKER;
use crate::config::RepoConfig;

/// Walk upward from `start` to the nearest directory containing `.git`.
///
/// `start` is canonicalized first, and so is the directory found, so the
/// returned root never contains symlinks.
pub fn find_root(start: &Path) -> Result<PathBuf, RepoError> {
    let resolved = resolve(start)?;

    // Walks up to and including the filesystem root, so `/.git` also counts
    let found = resolved
        .ancestors()
        .find(|dir| dir.join(GIT_MARKER).exists())
        .ok_or_else(|| RepoError::NotARepository {
            start: start.to_path_buf(),
        })?;

    resolve(found)
}

fn resolve(path: &Path) -> Result<PathBuf, RepoError> {
    path.canonicalize().map_err(|source| RepoError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}

impl Repository {
    /// Discover the repository containing `start`, shelling out to the git
    /// binary named in `config`.
    pub fn discover(start: &Path, config: &RepoConfig) -> Result<Self, RepoError> {
        let runner = Arc::new(GitCli::new(&config.git_binary));
        Self::discover_with(start, config, runner)
    }

    /// Discover the repository containing `start` using a caller-supplied runner.
    pub fn discover_with(
        start: &Path,
        config: &RepoConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, RepoError> {
        let root = find_root(start)?;
        debug!("Found git root {} from {}", root.display(), start.display());

        let default_upstream = resolve_default_upstream(
            runner.as_ref(),
            &root,
            config.effective_upstream_override(),
            &config.upstream_candidates,
        );
        let overrides = TrackedOverrides::load(&root, &config.tracked_overrides_file);

        info!(
            root = %root.display(),
            upstream = %default_upstream,
            overrides = overrides.len(),
            "Opened repository"
        );

        Ok(Self {
            root,
            default_upstream,
            overrides,
            runner,
            settle_interval: config.settle_interval,
        })
    }
}
