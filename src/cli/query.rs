// ABOUTME: One-shot repository queries for the CLI (root, branch, hash, changes, classification)
//
// Each query renders either plain text (one value per line) or a JSON document.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{Commands, OutputFormat};
use crate::config::UPSTREAM_ENV_VAR;
use crate::git::WorkingTree;

/// JSON output for the changed command
#[derive(Debug, Serialize)]
pub struct ChangedOutput<'a> {
    pub since: &'a str,
    pub count: usize,
    pub paths: Vec<String>,
}

/// JSON output for one classified path
#[derive(Debug, Serialize)]
pub struct PathStatus {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
}

/// Run a one-shot query and render it in the requested format
pub fn execute(tree: &dyn WorkingTree, command: &Commands, format: OutputFormat) -> Result<String> {
    match command {
        Commands::Root => Ok(scalar("root", &tree.root().display().to_string(), format)),
        Commands::Branch => Ok(scalar("branch", &tree.current_branch()?, format)),
        Commands::Sha => Ok(scalar("sha", &tree.head_sha()?, format)),
        Commands::Upstream => Ok(scalar("upstream", tree.default_upstream(), format)),
        Commands::Hash => Ok(scalar("hash", &tree.working_hash()?, format)),
        Commands::Changed(args) => {
            let since = match args.since.as_deref() {
                Some(since) => since,
                None => default_since(tree)?,
            };
            changed(tree, since, format)
        }
        Commands::Tracked(args) => classify(&args.paths, format, |path| PathStatus {
            path: path.display().to_string(),
            tracked: Some(tree.is_tracked(path)),
            ignored: None,
        }),
        Commands::Ignored(args) => classify(&args.paths, format, |path| PathStatus {
            path: path.display().to_string(),
            tracked: None,
            ignored: Some(tree.is_ignored(path)),
        }),
        Commands::Watch => Err(anyhow!("watch is not a one-shot query")),
    }
}

fn default_since(tree: &dyn WorkingTree) -> Result<&str> {
    let upstream = tree.default_upstream();
    if upstream.is_empty() {
        return Err(anyhow!(
            "No default upstream could be resolved. Pass --since or set {}",
            UPSTREAM_ENV_VAR
        ));
    }
    Ok(upstream)
}

fn scalar(key: &str, value: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => value.to_string(),
        OutputFormat::Json => serde_json::json!({ key: value }).to_string(),
    }
}

fn changed(tree: &dyn WorkingTree, since: &str, format: OutputFormat) -> Result<String> {
    let paths: Vec<String> = tree
        .changed_paths(since)
        .iter()
        .map(|path| path.display().to_string())
        .collect();

    match format {
        OutputFormat::Text => Ok(paths.join("\n")),
        OutputFormat::Json => {
            let output = ChangedOutput {
                since,
                count: paths.len(),
                paths,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

fn classify<F>(paths: &[PathBuf], format: OutputFormat, status: F) -> Result<String>
where
    F: Fn(&Path) -> PathStatus,
{
    let statuses: Vec<PathStatus> = paths.iter().map(|path| status(path)).collect();

    match format {
        OutputFormat::Text => Ok(statuses
            .iter()
            .map(|s| {
                let flag = s.tracked.or(s.ignored).unwrap_or(false);
                format!("{}\t{}", flag, s.path)
            })
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&statuses)?),
    }
}
