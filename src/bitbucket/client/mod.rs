//! Blocking HTTP client for the Bitbucket REST API v2.0.
//!
//! Each method maps onto exactly one endpoint below
//! `{base}/repositories/{username}/{slug}` and authenticates with HTTP basic
//! auth. Every method checks the response status; nothing is retried and
//! only the first page of a collection is returned.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::Credentials;

use super::BitbucketApi;
use super::error::BitbucketError;
use super::models::{Branch, NewPullRequest, Page, PullRequest, Repository, StateFilter};

/// Base URL of the public Bitbucket Cloud API.
pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bitbucket client bound to one repository.
#[derive(Clone)]
pub struct BitbucketClient {
    http: Client,
    repo_url: String,
    username: String,
    api_key: String,
}

impl fmt::Debug for BitbucketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitbucketClient")
            .field("repo_url", &self.repo_url)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl BitbucketClient {
    /// Creates a client for `repo_slug` owned by the configured user.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError::MissingCredentials`] when the username or
    /// API key is absent and [`BitbucketError::Client`] when the HTTP client
    /// cannot be built.
    pub fn new(
        credentials: &Credentials,
        repo_slug: &str,
        api_url: &str,
    ) -> Result<Self, BitbucketError> {
        let (Some(username), Some(api_key)) = (
            credentials.username.as_deref(),
            credentials.api_key.as_deref(),
        ) else {
            return Err(BitbucketError::MissingCredentials);
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("ket/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| BitbucketError::Client {
                message: error.to_string(),
            })?;

        let repo_url = format!(
            "{base}/repositories/{username}/{repo_slug}",
            base = api_url.trim_end_matches('/')
        );

        Ok(Self {
            http,
            repo_url,
            username: username.to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    /// Returns the repository resource URL all endpoints hang off.
    #[must_use]
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.repo_url)
    }

    /// Builds the URL of a named branch.
    ///
    /// Each `/`-separated part of the name becomes its own path segment, so
    /// `release/1.0` keeps its slash while `#`, `?` and `%` are
    /// percent-encoded instead of ending the path.
    fn branch_endpoint(&self, name: &str) -> Result<Url, BitbucketError> {
        let mut url = Url::parse(&self.repo_url).map_err(|error| BitbucketError::Client {
            message: format!("invalid API URL {}: {error}", self.repo_url),
        })?;
        url.path_segments_mut()
            .map_err(|()| BitbucketError::Client {
                message: format!("API URL {} cannot carry a path", self.repo_url),
            })?
            .extend(["refs", "branches"])
            .extend(name.split('/'));
        Ok(url)
    }

    fn execute(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, BitbucketError> {
        tracing::debug!(operation, "sending Bitbucket request");

        let response = request
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .map_err(|error| BitbucketError::Network {
                message: format!("{operation} failed: {error}"),
            })?;

        let status = response.status();
        tracing::debug!(operation, %status, "Bitbucket responded");
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().unwrap_or_default();
        Err(BitbucketError::Status { status, url, body })
    }

    fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, BitbucketError> {
        self.execute(operation, request)?
            .json()
            .map_err(|error| BitbucketError::Decode {
                message: format!("{operation}: {error}"),
            })
    }

    fn post_action(&self, operation: &str, suffix: &str) -> Result<(), BitbucketError> {
        self.execute(operation, self.http.post(self.endpoint(suffix)))
            .map(drop)
    }
}

impl BitbucketApi for BitbucketClient {
    fn get_repo(&self) -> Result<Repository, BitbucketError> {
        self.fetch_json("get repository", self.http.get(self.endpoint("")))
    }

    fn list_branches(&self) -> Result<Page<Branch>, BitbucketError> {
        self.fetch_json(
            "list branches",
            self.http.get(self.endpoint("/refs/branches")),
        )
    }

    fn get_branch(&self, name: &str) -> Result<Branch, BitbucketError> {
        let url = self.branch_endpoint(name)?;
        self.fetch_json("get branch", self.http.get(url))
    }

    fn list_pull_requests(
        &self,
        states: &[StateFilter],
    ) -> Result<Page<PullRequest>, BitbucketError> {
        let query: Vec<(&str, &str)> = states
            .iter()
            .map(|state| ("state", state.query_value()))
            .collect();

        self.fetch_json(
            "list pull requests",
            self.http.get(self.endpoint("/pullrequests")).query(&query),
        )
    }

    fn get_pull_request(&self, id: u64) -> Result<PullRequest, BitbucketError> {
        self.fetch_json(
            "get pull request",
            self.http.get(self.endpoint(&format!("/pullrequests/{id}"))),
        )
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest, BitbucketError> {
        self.fetch_json(
            "create pull request",
            self.http.post(self.endpoint("/pullrequests")).json(request),
        )
    }

    fn close_pull_request(&self, id: u64) -> Result<(), BitbucketError> {
        self.post_action("decline pull request", &format!("/pullrequests/{id}/decline"))
    }

    fn merge_pull_request(&self, id: u64) -> Result<(), BitbucketError> {
        self.post_action("merge pull request", &format!("/pullrequests/{id}/merge"))
    }

    fn approve_pull_request(&self, id: u64) -> Result<(), BitbucketError> {
        self.post_action("approve pull request", &format!("/pullrequests/{id}/approve"))
    }

    fn unapprove_pull_request(&self, id: u64) -> Result<(), BitbucketError> {
        let url = self.endpoint(&format!("/pullrequests/{id}/approve"));
        self.execute("unapprove pull request", self.http.delete(url))
            .map(drop)
    }

    fn get_pull_request_diff(&self, id: u64) -> Result<String, BitbucketError> {
        let url = self.endpoint(&format!("/pullrequests/{id}/diff"));
        self.execute("get pull request diff", self.http.get(url))?
            .text()
            .map_err(|error| BitbucketError::Decode {
                message: format!("get pull request diff: {error}"),
            })
    }
}
