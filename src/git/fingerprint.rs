// ABOUTME: Working-tree fingerprint combining HEAD identity with uncommitted diff content

use sha2::{Digest, Sha256};
use tracing::debug;

use super::repository::{RepoError, Repository};

impl Repository {
    /// Hex SHA-256 over `git diff HEAD` followed by `git rev-parse HEAD`.
    ///
    /// Staged and unstaged edits to tracked files both change the value, as
    /// does a new commit. Untracked files are not part of `git diff HEAD` and
    /// therefore never affect it.
    pub fn working_hash(&self) -> Result<String, RepoError> {
        let mut hasher = Sha256::new();

        let diff = self.git(["diff", "HEAD"])?;
        hasher.update(&diff);

        let head = self.git(["rev-parse", "HEAD"])?;
        hasher.update(&head);

        let hash = hex::encode(hasher.finalize());
        debug!(hash = %hash, diff_bytes = diff.len(), "Computed working hash");
        Ok(hash)
    }
}
