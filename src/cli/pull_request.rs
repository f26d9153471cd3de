//! Handlers for `ket pull-request` subcommands.

use ket::repo::Repo;

use super::output::{write_line, write_table};
use super::{CliError, PullRequestCommand};

/// Runs a pull request subcommand and prints its result.
///
/// Mutating commands print nothing on success.
///
/// # Errors
///
/// Returns [`CliError::Repo`] when the operation fails and [`CliError::Io`]
/// when its output cannot be written.
pub fn run(repo: &Repo, command: &PullRequestCommand) -> Result<(), CliError> {
    match command {
        PullRequestCommand::List { states } => write_table(&repo.list_pull_requests(states)?),
        PullRequestCommand::Show { id } => write_table(&repo.get_pull_request(*id)?),
        PullRequestCommand::Create {
            target_branch,
            messages,
        } => write_line(&repo.create_pull_request(target_branch, messages)?),
        PullRequestCommand::Close { id } => Ok(repo.close_pull_request(*id)?),
        PullRequestCommand::Merge { id } => Ok(repo.merge_pull_request(*id)?),
        PullRequestCommand::Approve { id } => Ok(repo.approve_pull_request(*id)?),
        PullRequestCommand::Unapprove { id } => Ok(repo.unapprove_pull_request(*id)?),
        PullRequestCommand::Diff { id } => write_line(&repo.get_pull_request_diff(*id)?),
        PullRequestCommand::Checkout { id } => Ok(repo.checkout_pull_request_branch(*id)?),
    }
}
