// ABOUTME: Library crate exposing a live, queryable view of a git working tree
// Consumed by selective test runners and incremental build tooling

#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod git;

pub use config::RepoConfig;
pub use git::{BranchWatcher, ChangeSet, RepoError, Repository, WorkingTree};
