// ABOUTME: Behavioral tests for configuration loading and how it shapes discovery
// Verifies TOML files, the environment override and a custom overrides file name

use anyhow::Result;
use std::time::Duration;

use repostate::cli::load_config;
use repostate::{RepoConfig, Repository};

use super::fixtures::TestRepo;
use crate::require_git;

#[test]
fn test_config_file_values_reach_the_repository() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    let config_path = repo.write(
        "repostate.toml",
        concat!(
            "upstream_override = \"origin/trunk\"\n",
            "tracked_overrides_file = \".always_tracked\"\n",
            "settle_interval = 25\n",
        ),
    )?;
    repo.write(".always_tracked", "\\.gen$\n")?;
    let generated = repo.write("api.gen", "data")?;

    let config = RepoConfig::load(&config_path)?;
    let opened = Repository::discover(repo.path(), &config)?;

    assert_eq!(opened.default_upstream(), "origin/trunk");
    assert_eq!(opened.settle_interval(), Duration::from_millis(25));
    assert!(opened.is_tracked(&generated));
    Ok(())
}

#[test]
fn test_malformed_config_file_is_an_error() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("repostate.toml");
    std::fs::write(&path, "settle_interval = \"soon\"")?;

    assert!(load_config(Some(&path)).is_err());
    Ok(())
}
