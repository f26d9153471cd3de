//! Git operations the repository facade depends on.
//!
//! The [`GitOperations`] trait lets the facade be tested without a real
//! working copy. [`LocalRepository`] implements it with libgit2 for
//! read-only queries and the `git` executable for anything that touches the
//! network, the index or the user's editor settings.

use std::process::{Command, Output};

use super::discovery::LocalRepository;
use super::error::LocalRepositoryError;

/// Local git operations used by the repository facade.
#[cfg_attr(test, mockall::automock)]
pub trait GitOperations {
    /// Returns the checked-out branch name.
    ///
    /// # Errors
    ///
    /// Returns an error when `HEAD` is detached or unreadable.
    fn current_branch(&self) -> Result<String, LocalRepositoryError>;

    /// Fetches `branch` from the remote.
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::Command`] with git's message on failure.
    fn fetch_branch(&self, branch: &str) -> Result<(), LocalRepositoryError>;

    /// Checks out `branch`, creating a tracking branch when needed.
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::Command`] with git's message on failure.
    fn checkout_branch(&self, branch: &str) -> Result<(), LocalRepositoryError>;

    /// Returns the editor command git would use (`git var GIT_EDITOR`).
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::Command`] when git cannot resolve one.
    fn editor_command(&self) -> Result<String, LocalRepositoryError>;
}

impl LocalRepository {
    fn run_git(&self, args: &[&str]) -> Result<String, LocalRepositoryError> {
        tracing::debug!(?args, "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(self.workdir())
            .output()
            .map_err(|error| LocalRepositoryError::Command {
                message: format!("failed to run git: {error}"),
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned());
        }
        Err(LocalRepositoryError::Command {
            message: failure_message(&output),
        })
    }
}

impl GitOperations for LocalRepository {
    fn current_branch(&self) -> Result<String, LocalRepositoryError> {
        self.head_branch()
    }

    fn fetch_branch(&self, branch: &str) -> Result<(), LocalRepositoryError> {
        let remote = self.remote()?;
        self.run_git(&["fetch", remote.name.as_str(), branch])
            .map(drop)
    }

    fn checkout_branch(&self, branch: &str) -> Result<(), LocalRepositoryError> {
        self.run_git(&["checkout", branch]).map(drop)
    }

    fn editor_command(&self) -> Result<String, LocalRepositoryError> {
        self.run_git(&["var", "GIT_EDITOR"])
    }
}

/// Builds a message from a failed git process, preferring its stderr.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        trimmed.to_owned()
    }
}
