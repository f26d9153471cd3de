//! Bitbucket REST API access.
//!
//! [`BitbucketApi`] is the seam between the repository facade and the
//! network. [`BitbucketClient`] implements it with a blocking `reqwest`
//! client; tests substitute a mock.

pub mod client;
pub mod error;
pub mod models;

pub use client::{BitbucketClient, DEFAULT_API_URL};
pub use error::BitbucketError;
pub use models::{
    Account, Branch, NewPullRequest, Page, Participant, PullRequest, PullRequestState, Repository,
    StateFilter,
};

/// Operations offered by the Bitbucket API for a single repository.
#[cfg_attr(test, mockall::automock)]
pub trait BitbucketApi {
    /// Fetches the repository resource.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn get_repo(&self) -> Result<Repository, BitbucketError>;

    /// Lists the first page of branches.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn list_branches(&self) -> Result<Page<Branch>, BitbucketError>;

    /// Fetches a single branch by name.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn get_branch(&self, name: &str) -> Result<Branch, BitbucketError>;

    /// Lists the first page of pull requests matching any of `states`.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn list_pull_requests(&self, states: &[StateFilter])
    -> Result<Page<PullRequest>, BitbucketError>;

    /// Fetches a single pull request.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn get_pull_request(&self, id: u64) -> Result<PullRequest, BitbucketError>;

    /// Opens a pull request and returns Bitbucket's representation of it.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest, BitbucketError>;

    /// Declines a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn close_pull_request(&self, id: u64) -> Result<(), BitbucketError>;

    /// Merges a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn merge_pull_request(&self, id: u64) -> Result<(), BitbucketError>;

    /// Approves a pull request as the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn approve_pull_request(&self, id: u64) -> Result<(), BitbucketError>;

    /// Withdraws the authenticated user's approval.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn unapprove_pull_request(&self, id: u64) -> Result<(), BitbucketError>;

    /// Fetches the raw unified diff of a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError`] on transport failure or non-2xx status.
    fn get_pull_request_diff(&self, id: u64) -> Result<String, BitbucketError>;
}
