//! Error types for local git access.

use thiserror::Error;

/// Errors raised while inspecting or changing the local working copy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocalRepositoryError {
    /// The directory is not inside a git working copy.
    #[error("Not a git repository")]
    NotARepository,

    /// The repository has no remotes configured.
    #[error("repository has no remotes configured")]
    NoRemotes,

    /// No repository slug could be taken from the remote URL.
    #[error("Unable to extract repo slug from remote URI: {url}")]
    InvalidRemoteUrl {
        /// The remote URL as configured.
        url: String,
    },

    /// HEAD does not point at a branch.
    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    /// A `git` subprocess failed; carries git's own message.
    #[error("{message}")]
    Command {
        /// Trimmed standard error of the git process.
        message: String,
    },

    /// A libgit2 operation failed.
    #[error("git error: {message}")]
    Git {
        /// Error detail from the git2 library.
        message: String,
    },
}

impl From<git2::Error> for LocalRepositoryError {
    fn from(error: git2::Error) -> Self {
        Self::Git {
            message: error.message().to_owned(),
        }
    }
}
