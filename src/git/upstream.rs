// ABOUTME: Resolves the default remote-tracking branch used as a diff baseline

use std::path::Path;
use tracing::{debug, warn};

use super::executor::{CommandRunner, GitCommand};
use crate::config::UPSTREAM_ENV_VAR;

/// Work out the default upstream reference for the repository at `root`.
///
/// Precedence:
/// 1. `override_ref`, trimmed, if non-empty (not verified against remotes)
/// 2. first remote branch git lists out of `candidates`
/// 3. empty string, with a warning telling the user how to configure it
pub fn resolve_default_upstream(
    runner: &dyn CommandRunner,
    root: &Path,
    override_ref: Option<&str>,
    candidates: &[String],
) -> String {
    if let Some(explicit) = override_ref.map(str::trim).filter(|s| !s.is_empty()) {
        debug!("Using configured default upstream {}", explicit);
        return explicit.to_string();
    }

    let mut args = vec!["branch".to_string(), "--list".to_string(), "--remote".to_string()];
    args.extend(candidates.iter().cloned());
    let command = GitCommand::new(args).in_dir(root);

    let found = match runner.run(&command) {
        Ok(output) if output.success => output
            .text()
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .unwrap_or_default(),
        Ok(output) => {
            debug!(
                command = %command,
                output = %output.text().trim(),
                "Remote branch query failed"
            );
            String::new()
        }
        Err(e) => {
            debug!(command = %command, error = %e, "Could not run remote branch query");
            String::new()
        }
    };

    if found.is_empty() {
        warn!(
            "No upstream branches could be detected from {:?}, such as 'origin/main'. \
             You will need to provide a valid branch name to use via {}",
            candidates, UPSTREAM_ENV_VAR
        );
    }

    found
}
