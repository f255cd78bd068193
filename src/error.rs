//! Domain errors for the pick workflow.
//!
//! Every failure the user is expected to act on is a [`PickError`]. Anything
//! else that reaches `main` (a broken terminal, an unreadable config file) is
//! treated as fatal.

use thiserror::Error;

/// Exit status for user-facing failures, including a declined confirmation.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for unexpected errors that are not a [`PickError`].
pub const EXIT_FATAL: i32 = 2;

#[derive(Debug, Error)]
pub enum PickError {
    /// Missing or malformed command line input
    #[error("{0}")]
    Usage(String),

    /// At least one `--commits` entry does not name a commit
    #[error("Given commits are invalid")]
    InvalidCommits,

    /// The upstream range holds no commits to offer
    #[error("No commits to pick")]
    NothingToPick,

    /// The selection ended up empty
    #[error("No commits chosen")]
    NoCommitsChosen,

    #[error("Branch name '{name}' is too short (minimum {min} characters)")]
    BranchNameTooShort { name: String, min: usize },

    #[error("Not a git repository: {0}")]
    NotARepository(String),

    /// An external command exited with a non-zero status
    #[error("`{command}` failed ({status})")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// An external command could not be started at all
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The user declined or interrupted a prompt
    #[error("Cancelled")]
    Cancelled,
}

impl PickError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Cancellation ends the run quietly, without a diagnostic.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, PickError::Cancelled)
    }
}

/// Maps any error that reached the entry point to a process exit status.
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<PickError>() {
        Some(pick_error) => pick_error.exit_code(),
        None => EXIT_FATAL,
    }
}
