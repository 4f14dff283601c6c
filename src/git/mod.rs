// ABOUTME: Git working-tree state: discovery, classification, change sets, hashing, branch watching

pub mod branch;
pub mod changes;
pub mod classifier;
pub mod executor;
pub mod fingerprint;
pub mod locator;
pub mod overrides;
pub mod repository;
pub mod upstream;
pub mod watcher;

/// Name of the metadata entry that marks a repository root
pub const GIT_MARKER: &str = ".git";

pub use changes::ChangeSet;
pub use executor::{CommandOutput, CommandRunner, GitCli, GitCommand};
pub use locator::find_root;
pub use overrides::TrackedOverrides;
pub use repository::{RepoError, Repository, WorkingTree};
pub use upstream::resolve_default_upstream;
pub use watcher::BranchWatcher;
