// ABOUTME: Current branch and HEAD commit queries

use super::repository::{RepoError, Repository};

impl Repository {
    /// Name of the checked-out branch; empty when HEAD is detached
    pub fn current_branch(&self) -> Result<String, RepoError> {
        let output = self.git(["branch", "--show-current"])?;
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }

    /// Commit id HEAD points at. Does not reflect uncommitted changes.
    pub fn head_sha(&self) -> Result<String, RepoError> {
        let output = self.git(["rev-parse", "HEAD"])?;
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }
}
