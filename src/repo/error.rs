//! Domain errors reported by the repository facade.

use thiserror::Error;

use crate::bitbucket::BitbucketError;
use crate::local::LocalRepositoryError;
use crate::message::MessageError;

/// Errors raised by [`super::Repo`] operations.
///
/// Each variant's message is fit to show the user as-is. HTTP failures
/// without a friendlier rendering are carried unchanged in
/// [`RepoError::Bitbucket`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepoError {
    /// Credentials are missing.
    #[error("{message}")]
    Authentication {
        /// Reason authentication is unavailable.
        message: String,
    },

    /// The working directory is not inside a git repository.
    #[error("Not a git repository")]
    NotARepository,

    /// No Bitbucket repository slug could be derived from the remotes.
    #[error("{message}")]
    Slug {
        /// Explanation naming the offending remote or URL.
        message: String,
    },

    /// The request was rejected locally before contacting Bitbucket.
    #[error("{message}")]
    Validation {
        /// Validation failure.
        message: String,
    },

    /// A pull request, branch or repository does not exist.
    #[error("{message}")]
    NotFound {
        /// Names the missing resource.
        message: String,
    },

    /// Bitbucket rejected the request with an explanation.
    #[error("{message}")]
    Rejected {
        /// Message returned by Bitbucket.
        message: String,
    },

    /// A local git operation failed.
    #[error("{message}")]
    Git {
        /// Git's own error message.
        message: String,
    },

    /// The message editor failed.
    #[error("{message}")]
    Editor {
        /// Editor failure detail.
        message: String,
    },

    /// Any other Bitbucket API failure.
    #[error(transparent)]
    Bitbucket(BitbucketError),
}

impl RepoError {
    /// Builds a [`RepoError::NotFound`] for a missing pull request.
    #[must_use]
    pub fn pull_request_not_found(id: u64) -> Self {
        Self::NotFound {
            message: format!("Pull request {id} not found"),
        }
    }

    /// Builds a [`RepoError::NotFound`] for a missing remote branch.
    #[must_use]
    pub fn branch_not_found(name: &str) -> Self {
        Self::NotFound {
            message: format!("Branch {name} not found"),
        }
    }
}

impl From<BitbucketError> for RepoError {
    fn from(error: BitbucketError) -> Self {
        match error {
            BitbucketError::MissingCredentials => Self::Authentication {
                message: error.to_string(),
            },
            other => Self::Bitbucket(other),
        }
    }
}

impl From<LocalRepositoryError> for RepoError {
    fn from(error: LocalRepositoryError) -> Self {
        match error {
            LocalRepositoryError::NotARepository => Self::NotARepository,
            LocalRepositoryError::NoRemotes | LocalRepositoryError::InvalidRemoteUrl { .. } => {
                Self::Slug {
                    message: error.to_string(),
                }
            }
            LocalRepositoryError::DetachedHead
            | LocalRepositoryError::Command { .. }
            | LocalRepositoryError::Git { .. } => Self::Git {
                message: error.to_string(),
            },
        }
    }
}

impl From<MessageError> for RepoError {
    fn from(error: MessageError) -> Self {
        Self::Editor {
            message: error.to_string(),
        }
    }
}
