// ABOUTME: Configuration for repository discovery, upstream resolution and branch watching
//
// Defines RepoConfig with the tunables the library needs:
// - Which git executable to run
// - Upstream override and candidate remote branches
// - Name of the tracked-overrides pattern file
// - Settle delay used by the branch watcher

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable that pins the default upstream reference
pub const UPSTREAM_ENV_VAR: &str = "GIT_DEFAULT_UPSTREAM";

/// File at the repository root listing regexes of paths to treat as tracked
pub const DEFAULT_TRACKED_OVERRIDES_FILE: &str = "._treat_as_tracked";

/// Configuration consumed by [`crate::git::Repository::discover`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Git executable name or path
    pub git_binary: String,

    /// Upstream reference to use instead of querying remotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_override: Option<String>,

    /// Remote branches tried, in order, when no override is set
    pub upstream_candidates: Vec<String>,

    /// Pattern file name, relative to the repository root
    pub tracked_overrides_file: String,

    /// Delay after a burst of .git writes before re-reading the branch
    #[serde(with = "duration_millis")]
    pub settle_interval: Duration,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            upstream_override: None,
            upstream_candidates: vec!["origin/main".to_string(), "origin/master".to_string()],
            tracked_overrides_file: DEFAULT_TRACKED_OVERRIDES_FILE.to_string(),
            settle_interval: Duration::from_millis(100),
        }
    }
}

impl RepoConfig {
    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply `GIT_DEFAULT_UPSTREAM` from the process environment.
    ///
    /// Only binaries should call this; library code takes the config as given.
    #[must_use]
    pub fn apply_env(self) -> Self {
        let value = std::env::var(UPSTREAM_ENV_VAR).ok();
        self.with_upstream_env(value.as_deref())
    }

    /// A non-empty (after trimming) environment value replaces any configured override
    #[must_use]
    pub fn with_upstream_env(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.upstream_override = Some(value.to_string());
        }
        self
    }

    /// The override to honour, if it is non-empty once trimmed
    pub fn effective_upstream_override(&self) -> Option<&str> {
        self.upstream_override
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
