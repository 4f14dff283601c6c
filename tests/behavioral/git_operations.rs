// ABOUTME: Behavioral tests for repository queries using real temporary repos
// Tests verify root discovery, upstream resolution, classification, change sets and hashing

use anyhow::Result;
use std::fs;
use std::path::Path;

use repostate::git::RepoError;
use repostate::{RepoConfig, Repository, WorkingTree};

use super::fixtures::TestRepo;
use crate::require_git;

fn open(path: &Path) -> Result<Repository> {
    Ok(Repository::discover(path, &RepoConfig::default())?)
}

/// Any directory inside the tree resolves to the same root
#[test]
fn test_root_is_found_from_nested_directory() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    let nested = repo.path().join("src").join("deep");
    fs::create_dir_all(&nested)?;

    let from_root = open(repo.path())?;
    let from_nested = open(&nested)?;

    assert_eq!(from_root.root(), repo.path());
    assert_eq!(from_nested.root(), from_root.root());
    Ok(())
}

/// A plain directory with no .git anywhere above it is rejected
#[test]
fn test_directory_outside_any_repository_is_rejected() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    if dir.path().ancestors().any(|d| d.join(".git").exists()) {
        return Ok(());
    }

    let err = Repository::discover(dir.path(), &RepoConfig::default()).unwrap_err();
    assert!(matches!(err, RepoError::NotARepository { .. }));
    Ok(())
}

/// Without remotes and without an override the upstream is empty
#[test]
fn test_upstream_is_empty_without_remote_branches() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;

    assert_eq!(open(repo.path())?.default_upstream(), "");
    Ok(())
}

/// The first existing candidate remote branch becomes the default upstream
#[test]
fn test_upstream_found_from_remote_branches() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    repo.fake_remote_branch("origin/master")?;

    assert_eq!(open(repo.path())?.default_upstream(), "origin/master");
    Ok(())
}

/// A configured override wins over whatever the remotes say
#[test]
fn test_upstream_override_is_not_verified() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    repo.fake_remote_branch("origin/main")?;

    let config = RepoConfig::default().with_upstream_env(Some("origin/release"));
    let opened = Repository::discover(repo.path(), &config)?;

    assert_eq!(opened.default_upstream(), "origin/release");
    Ok(())
}

/// Index membership, override patterns and ignore rules classify paths
#[test]
fn test_tracked_and_ignored_classification() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    repo.add_commit(".gitignore", "*.log\ngenerated/\n", "Ignore logs")?;
    repo.write("._treat_as_tracked", "^generated/\n\n[unclosed\n")?;
    let generated = repo.write("generated/schema.rs", "// generated")?;
    let log = repo.write("build.log", "noise")?;
    let scratch = repo.write("scratch.txt", "notes")?;

    let opened = open(repo.path())?;

    assert_eq!(opened.overrides().len(), 1);
    assert!(opened.is_tracked(&repo.path().join("README.md")));
    assert!(opened.is_tracked(Path::new("README.md")));
    assert!(opened.is_tracked(&generated));
    assert!(!opened.is_tracked(&scratch));
    assert!(!opened.is_tracked(&log));

    assert!(opened.is_ignored(&log));
    assert!(opened.is_ignored(&generated), "overrides never affect ignore rules");
    assert!(!opened.is_ignored(&scratch));
    Ok(())
}

/// Committed changes since a reference and uncommitted edits are both reported
#[test]
fn test_changed_paths_unions_committed_and_modified() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    let base = repo.git(&["rev-parse", "HEAD"])?;
    repo.add_commit("src/lib.rs", "pub fn f() {}\n", "Add lib")?;
    fs::write(repo.path().join("README.md"), "# Edited\n")?;
    repo.write("untracked.txt", "new")?;

    let changes = open(repo.path())?.changed_paths(&base);

    assert_eq!(changes.len(), 2);
    assert!(changes.contains(&repo.path().join("src/lib.rs")));
    assert!(changes.contains(&repo.path().join("README.md")));
    Ok(())
}

/// A reference git does not know yields an empty set rather than an error
#[test]
fn test_changed_paths_with_unknown_ref_is_empty() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    fs::write(repo.path().join("README.md"), "# Edited\n")?;

    let changes = open(repo.path())?.changed_paths("no-such-ref");

    assert!(changes.is_empty());
    Ok(())
}

/// A ref that looks like a git option is treated as a bad revision, not obeyed
#[test]
fn test_option_like_ref_writes_nothing() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    let target = repo.path().join("leak");

    let changes = open(repo.path())?.changed_paths(&format!("--output={}", target.display()));

    assert!(changes.is_empty());
    let mut entries = Vec::new();
    for entry in fs::read_dir(repo.path())? {
        entries.push(entry?.file_name().to_string_lossy().into_owned());
    }
    entries.sort();
    assert_eq!(entries, vec![".git", "README.md"]);
    Ok(())
}

/// Names git would C-quote come back as the real paths on disk
#[test]
fn test_changed_paths_keep_unusual_names_verbatim() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    repo.add_commit("a\"b.txt", "one\n", "Add quoted name")?;
    repo.add_commit("caf\u{e9}.txt", "one\n", "Add accented name")?;
    let quoted = repo.write("a\"b.txt", "two\n")?;
    let accented = repo.write("caf\u{e9}.txt", "two\n")?;

    let changes = open(repo.path())?.changed_paths("HEAD");

    assert_eq!(changes.len(), 2);
    for path in [&quoted, &accented] {
        assert!(changes.contains(path), "missing {}", path.display());
        assert!(path.exists());
    }
    Ok(())
}

/// The hash is stable at rest and moves with edits and commits
#[test]
fn test_working_hash_tracks_tree_state() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    let opened = open(repo.path())?;

    let clean = opened.working_hash()?;
    assert_eq!(clean.len(), 64);
    assert_eq!(opened.working_hash()?, clean);

    repo.write("untracked.txt", "ignored by the hash")?;
    assert_eq!(opened.working_hash()?, clean);

    fs::write(repo.path().join("README.md"), "# Edited\n")?;
    let edited = opened.working_hash()?;
    assert_ne!(edited, clean);

    repo.git(&["commit", "--quiet", "-am", "Edit readme"])?;
    let committed = opened.working_hash()?;
    assert_ne!(committed, clean);
    assert_ne!(committed, edited);
    Ok(())
}

/// Branch and commit queries agree with git itself
#[test]
fn test_branch_and_head_queries() -> Result<()> {
    require_git!();
    let repo = TestRepo::new()?;
    repo.create_branch("feature/parser")?;
    let opened = open(repo.path())?;

    assert_eq!(opened.current_branch()?, "feature/parser");
    assert_eq!(opened.head_sha()?, repo.git(&["rev-parse", "HEAD"])?);

    let head = opened.head_sha()?;
    repo.checkout(&head)?;
    assert_eq!(opened.current_branch()?, "", "detached HEAD has no branch");
    Ok(())
}
