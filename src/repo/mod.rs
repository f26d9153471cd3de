//! Repository facade.
//!
//! [`Repo`] binds the local working copy to its Bitbucket repository and
//! exposes the pull request workflows the CLI offers. API failures are
//! mapped to [`RepoError`] values whose messages can be shown verbatim;
//! listings come back as display-ready [`Table`]s.

mod error;

use std::path::Path;

use http::StatusCode;

use crate::bitbucket::{BitbucketApi, BitbucketClient, BitbucketError, NewPullRequest, StateFilter};
use crate::config::KetConfig;
use crate::local::{GitOperations, LocalRepository};
use crate::message::{PullRequestMessage, edit_pull_request_message, message_template};
use crate::output::Table;

pub use error::RepoError;

/// Headers of the pull request listing.
pub const LIST_HEADERS: [&str; 5] = ["ID", "State", "Author", "Title", "URL"];

const PUSH_HINT: &str = "Did you forget to push?";

/// A local git repository paired with its Bitbucket counterpart.
pub struct Repo {
    api: Box<dyn BitbucketApi>,
    git: Box<dyn GitOperations>,
    username: String,
    slug: String,
}

impl std::fmt::Debug for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo")
            .field("username", &self.username)
            .field("slug", &self.slug)
            .finish_non_exhaustive()
    }
}

impl Repo {
    /// Opens the repository containing `path` using `config` for API access.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotARepository`] outside a git working copy,
    /// [`RepoError::Slug`] when no remote yields a slug, and
    /// [`RepoError::Authentication`] when credentials are incomplete.
    pub fn open(path: &Path, config: &KetConfig) -> Result<Self, RepoError> {
        let local = LocalRepository::discover(path)?;
        let remote = local.remote()?;
        let slug = remote.slug()?;
        let client = BitbucketClient::new(&config.credentials, &slug, &config.api_url)?;
        let username = config.credentials.username.clone().unwrap_or_default();

        tracing::debug!(remote = %remote.name, %username, %slug, "opened repository");
        Ok(Self::new(Box::new(client), Box::new(local), username, slug))
    }

    /// Builds a facade from explicit collaborators.
    #[must_use]
    pub fn new(
        api: Box<dyn BitbucketApi>,
        git: Box<dyn GitOperations>,
        username: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            api,
            git,
            username: username.into(),
            slug: slug.into(),
        }
    }

    /// Returns the Bitbucket repository slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Returns the repository owner used in API URLs.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Lists pull requests in any of `states`.
    ///
    /// `All` supersedes every other filter; no filter means open pull
    /// requests only.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Bitbucket`] when the request fails.
    pub fn list_pull_requests(&self, states: &[StateFilter]) -> Result<Table, RepoError> {
        let filters = effective_states(states);
        let page = self.api.list_pull_requests(&filters)?;

        let mut table = Table::with_headers(LIST_HEADERS);
        for pull_request in &page.values {
            table.push_row([
                pull_request.id.to_string(),
                pull_request.state.to_string(),
                pull_request.author_name().to_owned(),
                pull_request.title.clone(),
                pull_request.html_url().to_owned(),
            ]);
        }
        Ok(table)
    }

    /// Describes a single pull request as key/value rows.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request.
    pub fn get_pull_request(&self, id: u64) -> Result<Table, RepoError> {
        let pull_request = self
            .api
            .get_pull_request(id)
            .map_err(|error| pull_request_error(error, id))?;

        let mut table = Table::headerless();
        table.push_row(["ID".to_owned(), pull_request.id.to_string()]);
        table.push_row(["State".to_owned(), pull_request.state.to_string()]);
        table.push_row(["Author".to_owned(), pull_request.author_name().to_owned()]);
        table.push_row(["Title".to_owned(), pull_request.title.clone()]);
        table.push_row([
            "Description".to_owned(),
            pull_request.description.clone().unwrap_or_default(),
        ]);
        table.push_row(["URL".to_owned(), pull_request.html_url().to_owned()]);
        table.push_row([
            "Source branch".to_owned(),
            pull_request.source_branch().to_owned(),
        ]);
        table.push_row([
            "Target branch".to_owned(),
            pull_request.destination_branch().to_owned(),
        ]);
        table.push_row(["Approvals".to_owned(), pull_request.approvals().to_string()]);
        Ok(table)
    }

    /// Opens a pull request from the checked-out branch into `target_branch`
    /// and returns its URL.
    ///
    /// `messages` supply the title (first entry) and description (the rest).
    /// When empty, the user's git editor is opened instead.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Validation`] when source and target match or the
    /// title is empty, [`RepoError::NotFound`] when the repository or source
    /// branch is missing remotely, and [`RepoError::Rejected`] with
    /// Bitbucket's explanation for a refused request.
    pub fn create_pull_request(
        &self,
        target_branch: &str,
        messages: &[String],
    ) -> Result<String, RepoError> {
        let source_branch = self.git.current_branch()?;
        if source_branch == target_branch {
            return Err(RepoError::Validation {
                message: "Source and target branches must be different".to_owned(),
            });
        }

        self.verify_remote_repository()?;
        self.verify_remote_branch(&source_branch)
            .map_err(|error| match error {
                RepoError::NotFound { message } => RepoError::NotFound {
                    message: format!("{message}. {PUSH_HINT}"),
                },
                other => other,
            })?;

        let message = self.pull_request_message(messages, &source_branch, target_branch)?;
        let title = message.title.ok_or_else(|| RepoError::Validation {
            message: "Aborting (empty pull request title)".to_owned(),
        })?;

        let request =
            NewPullRequest::new(&source_branch, target_branch, title, message.description);
        let created = self
            .api
            .create_pull_request(&request)
            .map_err(rejection_error)?;

        tracing::info!(
            id = created.id,
            source = %source_branch,
            target = %target_branch,
            "created pull request"
        );
        Ok(created.html_url().to_owned())
    }

    /// Declines a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request.
    pub fn close_pull_request(&self, id: u64) -> Result<(), RepoError> {
        self.api
            .close_pull_request(id)
            .map_err(|error| pull_request_error(error, id))
    }

    /// Merges a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request.
    pub fn merge_pull_request(&self, id: u64) -> Result<(), RepoError> {
        self.api
            .merge_pull_request(id)
            .map_err(|error| pull_request_error(error, id))
    }

    /// Approves a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request.
    pub fn approve_pull_request(&self, id: u64) -> Result<(), RepoError> {
        self.api
            .approve_pull_request(id)
            .map_err(|error| pull_request_error(error, id))
    }

    /// Withdraws an approval.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request.
    pub fn unapprove_pull_request(&self, id: u64) -> Result<(), RepoError> {
        self.api
            .unapprove_pull_request(id)
            .map_err(|error| pull_request_error(error, id))
    }

    /// Returns the unified diff of a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request.
    pub fn get_pull_request_diff(&self, id: u64) -> Result<String, RepoError> {
        self.api
            .get_pull_request_diff(id)
            .map_err(|error| pull_request_error(error, id))
    }

    /// Fetches and checks out the source branch of a pull request.
    ///
    /// The working copy is untouched unless the branch exists remotely.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown pull request or branch
    /// and [`RepoError::Git`] with git's message when fetch or checkout fail.
    pub fn checkout_pull_request_branch(&self, id: u64) -> Result<(), RepoError> {
        let pull_request = self
            .api
            .get_pull_request(id)
            .map_err(|error| pull_request_error(error, id))?;
        let branch = pull_request.source_branch();

        self.verify_remote_branch(branch)?;
        self.git.fetch_branch(branch)?;
        self.git.checkout_branch(branch)?;

        tracing::info!(id, branch, "checked out pull request branch");
        Ok(())
    }

    fn verify_remote_repository(&self) -> Result<(), RepoError> {
        match self.api.get_repo() {
            Ok(_) => Ok(()),
            Err(error) if error.is_not_found() => Err(RepoError::NotFound {
                message: format!(
                    "Bitbucket repository {}/{} not found",
                    self.username, self.slug
                ),
            }),
            Err(error) => Err(error.into()),
        }
    }

    fn verify_remote_branch(&self, name: &str) -> Result<(), RepoError> {
        match self.api.get_branch(name) {
            Ok(_) => Ok(()),
            Err(error) if error.is_not_found() => Err(RepoError::branch_not_found(name)),
            Err(error) => Err(error.into()),
        }
    }

    fn pull_request_message(
        &self,
        messages: &[String],
        source_branch: &str,
        target_branch: &str,
    ) -> Result<PullRequestMessage, RepoError> {
        if !messages.is_empty() {
            return Ok(PullRequestMessage::parse(messages));
        }

        let editor = self.git.editor_command()?;
        let lines = edit_pull_request_message(
            &editor,
            &message_template(source_branch, target_branch),
        )?;
        Ok(PullRequestMessage::parse(&lines))
    }
}

/// Resolves the filters actually sent to Bitbucket.
fn effective_states(states: &[StateFilter]) -> Vec<StateFilter> {
    if states.contains(&StateFilter::All) {
        return vec![StateFilter::All];
    }
    if states.is_empty() {
        return vec![StateFilter::Open];
    }

    let mut filters = Vec::with_capacity(states.len());
    for state in states {
        if !filters.contains(state) {
            filters.push(*state);
        }
    }
    filters
}

fn pull_request_error(error: BitbucketError, id: u64) -> RepoError {
    if error.is_not_found() {
        RepoError::pull_request_not_found(id)
    } else {
        error.into()
    }
}

fn rejection_error(error: BitbucketError) -> RepoError {
    let server_message = (error.status() == Some(StatusCode::BAD_REQUEST))
        .then(|| error.server_message())
        .flatten();
    server_message.map_or_else(|| error.into(), |message| RepoError::Rejected { message })
}
