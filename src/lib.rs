//! # pr-cli
//!
//! Ports upstream commits to a fresh branch without touching your checkout:
//! pick the commits, cherry-pick them in a throwaway git worktree, push the
//! branch and open a pull request.
//!
//! ## Quick Start
//!
//! ```bash
//! # Choose commits from `upstream/release..` interactively
//! pr-cli pick release
//!
//! # Pick known commits onto a named branch, push only
//! pr-cli pick release --commits abc123,def456 --branch fix-thing --no-pr
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - Command implementations (`pick`, `completions`)
//! - [`commits`] - Resolves explicit or interactively selected commits
//! - [`branch`] - Branch name suggestion and validation
//! - [`workflow`] - Settings, confirmation summary and the cherry-pick executor
//! - [`shell`] - External process execution with an explicit working directory
//! - [`prompt`] - Prompt requests and terminal / scripted prompters
//! - [`config`] - Layered `.pr-cli.toml` configuration
//! - [`git`] - Repository discovery and remote checks using the git2 crate
//! - [`traits`] - Defines the CommandRunner trait for testability
//! - [`error`] - Domain errors and exit codes

pub mod branch;
pub mod commands;
pub mod commits;
pub mod config;
pub mod error;
pub mod git;
pub mod prompt;
pub mod shell;
pub mod slug;
pub mod traits;
pub mod workflow;

pub use anyhow::Result;
