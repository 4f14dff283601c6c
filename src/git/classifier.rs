// ABOUTME: Tracked / ignored classification of paths, honouring user override patterns

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::executor::GitCommand;
use super::repository::Repository;

impl Repository {
    /// Whether `path` should be treated as version-controlled.
    ///
    /// Override patterns are checked first against the root-relative path and
    /// short-circuit to `true`. Otherwise git is asked whether it knows the
    /// path; any failure counts as untracked.
    pub fn is_tracked(&self, path: &Path) -> bool {
        let absolute = self.absolute(path);

        let query_path = match self.relative_to_root(&absolute) {
            Some(relative) => {
                if self.matches_override(&relative) {
                    return true;
                }
                relative
            }
            None => {
                warn!("{} is not inside {}", path.display(), self.root.display());
                absolute.into_owned()
            }
        };

        let command = GitCommand::new(["ls-files", "--error-unmatch", "--"])
            .path_arg(&query_path)
            .in_dir(&self.root);
        self.succeeds(&command)
    }

    /// Whether git's ignore rules exclude `path`. Override patterns play no part.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let absolute = self.absolute(path);
        let command = GitCommand::new(["check-ignore", "-q", "--"])
            .path_arg(&absolute)
            .in_dir(&self.root);
        self.succeeds(&command)
    }

    fn matches_override(&self, relative: &Path) -> bool {
        let relative_str = relative.to_string_lossy();
        match self.overrides.find_match(&relative_str) {
            Some(pattern) => {
                debug!(
                    path = %relative_str,
                    pattern = pattern.as_str(),
                    "Path treated as tracked by override"
                );
                true
            }
            None => false,
        }
    }

    fn succeeds(&self, command: &GitCommand) -> bool {
        match self.run(command) {
            Ok(output) => output.success,
            Err(e) => {
                debug!(error = %e, "Treating failed query as negative");
                false
            }
        }
    }

    /// Relative inputs are interpreted against the root
    fn absolute<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        if path.is_absolute() {
            Cow::Borrowed(path)
        } else {
            Cow::Owned(self.root.join(path))
        }
    }

    /// Root-relative form of `path`, trying its canonical form when the
    /// literal path is not under the root (e.g. it goes through a symlink)
    fn relative_to_root(&self, path: &Path) -> Option<PathBuf> {
        if let Ok(relative) = path.strip_prefix(&self.root) {
            return Some(relative.to_path_buf());
        }
        let canonical = path.canonicalize().ok()?;
        canonical
            .strip_prefix(&self.root)
            .ok()
            .map(Path::to_path_buf)
    }
}
