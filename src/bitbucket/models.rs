//! Data models for Bitbucket REST API v2.0 payloads.
//!
//! Only the fields the CLI reads are modelled. Missing optional fields
//! deserialise to their defaults so that partial payloads (deleted authors,
//! empty descriptions) do not abort a command.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pull request state filter accepted by `list`.
///
/// `All` is not a Bitbucket state. It is sent as the literal token `ALL`,
/// which Bitbucket does not recognise and therefore answers with an
/// unfiltered list of pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum StateFilter {
    /// Every pull request regardless of state.
    All,
    /// Open pull requests.
    Open,
    /// Merged pull requests.
    Merged,
    /// Declined pull requests.
    Declined,
    /// Superseded pull requests.
    Superseded,
}

impl StateFilter {
    /// Returns the value sent in the `state` query parameter.
    #[must_use]
    pub const fn query_value(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
            Self::Declined => "DECLINED",
            Self::Superseded => "SUPERSEDED",
        }
    }
}

/// Pull request state as reported by Bitbucket.
///
/// States this client does not model are kept, lowercased, in `Other`. A
/// payload without a state decodes to an empty `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PullRequestState {
    /// Open and awaiting review.
    Open,
    /// Merged into the destination branch.
    Merged,
    /// Declined (closed without merging).
    Declined,
    /// Replaced by another pull request.
    Superseded,
    /// Any other state, lowercased.
    Other(String),
}

impl Default for PullRequestState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for PullRequestState {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "OPEN" => Self::Open,
            "MERGED" => Self::Merged,
            "DECLINED" => Self::Declined,
            "SUPERSEDED" => Self::Superseded,
            _ => Self::Other(raw.to_lowercase()),
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Declined => "declined",
            Self::Superseded => "superseded",
            Self::Other(raw) => raw.as_str(),
        })
    }
}

/// A single page of a paginated collection.
///
/// Only `values` is decoded; pagination links are never followed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

/// Repository resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Repository {
    /// `workspace/slug` name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Repository slug.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Branch resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Commit the branch points at.
    #[serde(default)]
    pub target: Option<Commit>,
}

/// Commit reference embedded in other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Commit {
    /// Full commit hash.
    pub hash: String,
}

/// Pull request resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    /// Pull request identifier.
    pub id: u64,
    /// Current state.
    #[serde(default)]
    pub state: PullRequestState,
    /// Author account.
    #[serde(default)]
    pub author: Option<Account>,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Description. Bitbucket sends an empty string when none was given.
    #[serde(default)]
    pub description: Option<String>,
    /// Related links.
    #[serde(default)]
    pub links: Links,
    /// Source endpoint.
    #[serde(default)]
    pub source: Endpoint,
    /// Destination endpoint.
    #[serde(default)]
    pub destination: Endpoint,
    /// Reviewers and other participants.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl PullRequest {
    /// Returns the author's display name, or an empty string.
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|account| account.display_name.as_deref())
            .unwrap_or_default()
    }

    /// Returns the canonical web URL, or an empty string.
    #[must_use]
    pub fn html_url(&self) -> &str {
        self.links
            .html
            .as_ref()
            .map(|link| link.href.as_str())
            .unwrap_or_default()
    }

    /// Returns the source branch name.
    #[must_use]
    pub fn source_branch(&self) -> &str {
        &self.source.branch.name
    }

    /// Returns the destination branch name.
    #[must_use]
    pub fn destination_branch(&self) -> &str {
        &self.destination.branch.name
    }

    /// Counts participants that approved the pull request.
    #[must_use]
    pub fn approvals(&self) -> usize {
        self.participants
            .iter()
            .filter(|participant| participant.approved)
            .count()
    }
}

/// User account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Link collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Links {
    /// Browser URL.
    #[serde(default)]
    pub html: Option<Link>,
}

/// A single hyperlink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Target URL.
    pub href: String,
}

/// Source or destination of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Endpoint {
    /// Branch on this side of the pull request.
    #[serde(default)]
    pub branch: BranchName,
}

/// Branch name wrapper used inside endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchName {
    /// Branch name.
    #[serde(default)]
    pub name: String,
}

impl Endpoint {
    /// Builds an endpoint for the given branch.
    #[must_use]
    pub fn for_branch(name: impl Into<String>) -> Self {
        Self {
            branch: BranchName { name: name.into() },
        }
    }
}

/// Pull request participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Participant {
    /// Participant account.
    #[serde(default)]
    pub user: Option<Account>,
    /// Whether the participant approved.
    #[serde(default)]
    pub approved: bool,
}

/// Request body for creating a pull request.
///
/// The destination branch is sent under both `target` and Bitbucket's
/// documented `destination` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Branch to merge from.
    pub source: Endpoint,
    /// Branch to merge into.
    pub target: Endpoint,
    /// Same branch as `target`.
    pub destination: Endpoint,
}

impl NewPullRequest {
    /// Assembles a create request.
    #[must_use]
    pub fn new(
        source_branch: &str,
        target_branch: &str,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description,
            source: Endpoint::for_branch(source_branch),
            target: Endpoint::for_branch(target_branch),
            destination: Endpoint::for_branch(target_branch),
        }
    }
}

/// Error envelope returned with 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{NewPullRequest, PullRequest, PullRequestState, StateFilter};

    #[test]
    fn pull_request_decodes_fields_used_by_the_cli() {
        let pr: PullRequest = serde_json::from_value(json!({
            "id": 7,
            "state": "MERGED",
            "author": { "display_name": "Jane Doe" },
            "title": "Add feature",
            "description": "Long text",
            "links": { "html": { "href": "https://bitbucket.org/team/repo/pull-requests/7" } },
            "source": { "branch": { "name": "feature" } },
            "destination": { "branch": { "name": "master" } },
            "participants": [
                { "user": { "display_name": "A" }, "approved": true },
                { "user": { "display_name": "B" }, "approved": false },
                { "user": { "display_name": "C" }, "approved": true }
            ]
        }))
        .expect("pull request should decode");

        assert_eq!(pr.id, 7);
        assert_eq!(pr.state, PullRequestState::Merged);
        assert_eq!(pr.author_name(), "Jane Doe");
        assert_eq!(pr.html_url(), "https://bitbucket.org/team/repo/pull-requests/7");
        assert_eq!(pr.source_branch(), "feature");
        assert_eq!(pr.destination_branch(), "master");
        assert_eq!(pr.approvals(), 2);
    }

    #[test]
    fn pull_request_tolerates_missing_optional_fields() {
        let pr: PullRequest = serde_json::from_value(json!({ "id": 1, "author": null }))
            .expect("sparse pull request should decode");

        assert_eq!(pr.author_name(), "");
        assert_eq!(pr.html_url(), "");
        assert_eq!(pr.description, None);
        assert_eq!(pr.approvals(), 0);
    }

    #[rstest]
    #[case::known("MERGED", "merged")]
    #[case::unmodelled("DRAFTED", "drafted")]
    #[case::mixed_case("Queued", "queued")]
    fn state_is_displayed_lowercased(#[case] raw: &str, #[case] shown: &str) {
        let pr: PullRequest = serde_json::from_value(json!({ "id": 1, "state": raw }))
            .expect("state should decode");

        assert_eq!(pr.state.to_string(), shown);
    }

    #[test]
    fn unmodelled_state_keeps_server_value() {
        let pr: PullRequest = serde_json::from_value(json!({ "id": 1, "state": "DRAFTED" }))
            .expect("unknown state should decode");

        assert_eq!(pr.state, PullRequestState::Other("drafted".to_owned()));
    }

    #[test]
    fn missing_state_is_not_reported_as_open() {
        let pr: PullRequest =
            serde_json::from_value(json!({ "id": 1 })).expect("stateless pull request should decode");

        assert_ne!(pr.state, PullRequestState::Open);
        assert_eq!(pr.state.to_string(), "");
    }

    #[rstest]
    #[case::all(StateFilter::All, "ALL")]
    #[case::open(StateFilter::Open, "OPEN")]
    #[case::superseded(StateFilter::Superseded, "SUPERSEDED")]
    fn state_filters_are_sent_uppercased(#[case] filter: StateFilter, #[case] expected: &str) {
        assert_eq!(filter.query_value(), expected);
    }

    #[test]
    fn new_pull_request_serialises_branch_endpoints() {
        let request = NewPullRequest::new("feature", "master", "Title", Some("Body".to_owned()));

        let value = serde_json::to_value(&request).expect("request should serialise");

        assert_eq!(
            value,
            json!({
                "title": "Title",
                "description": "Body",
                "source": { "branch": { "name": "feature" } },
                "target": { "branch": { "name": "master" } },
                "destination": { "branch": { "name": "master" } }
            })
        );
    }
}
