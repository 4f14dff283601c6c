// ABOUTME: Change-set computation: files differing from a reference plus uncommitted edits

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::repository::Repository;

/// Deduplicated set of absolute paths under the repository root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    paths: BTreeSet<PathBuf>,
}

impl ChangeSet {
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Add every non-blank NUL-terminated entry of `output` as a path relative to `root`
    fn extend_from_output(&mut self, root: &Path, output: &[u8]) {
        let text = String::from_utf8_lossy(output);
        let entries = text
            .split('\0')
            .map(str::trim)
            .filter(|entry| !entry.is_empty());
        for entry in entries {
            if let Some(path) = join_under(root, entry) {
                self.paths.insert(path);
            }
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = PathBuf;
    type IntoIter = std::collections::btree_set::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl FromIterator<PathBuf> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Lexically join a git-reported relative path onto `root`.
///
/// Returns `None` for entries that are absolute or climb out of the root.
fn join_under(root: &Path, entry: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                joined.pop();
                depth -= 1;
            }
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (depth > 0).then_some(joined)
}

impl Repository {
    /// Absolute paths that differ from `since_ref`, plus files modified in the
    /// working tree but not yet committed.
    ///
    /// Best effort: a failing query is logged and whatever was gathered before
    /// it is returned.
    pub fn changed_paths(&self, since_ref: &str) -> ChangeSet {
        let mut changes = ChangeSet::default();

        // A ref starting with '-' must never be read as a diff option
        let range = format!("{since_ref}...");
        match self.git(["diff", "--name-only", "-z", "--end-of-options", range.as_str()]) {
            Ok(output) => changes.extend_from_output(&self.root, &output),
            Err(e) => {
                warn!("{}", e);
                return changes;
            }
        }

        match self.git(["ls-files", "--modified", "-z"]) {
            Ok(output) => changes.extend_from_output(&self.root, &output),
            Err(e) => warn!("{}", e),
        }

        debug!(since = since_ref, count = changes.len(), "Computed changed paths");
        changes
    }
}
