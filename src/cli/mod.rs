//! Command-line definitions and dispatch.
//!
//! - [`pull_request`]: handlers for the `pull-request` subcommands
//! - [`output`]: writing tables and text to stdout
//!
//! Global options are resolved by clap from flags and `KET_*` environment
//! variables, then layered over the configuration file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ket::bitbucket::StateFilter;
use ket::config::{ConfigError, ConfigOverrides, KetConfig};
use ket::repo::{Repo, RepoError};
use thiserror::Error;

pub mod output;
pub mod pull_request;

/// Command-line interface for Bitbucket pull requests.
#[derive(Debug, Parser)]
#[command(name = "ket", version)]
#[command(about = "Work with Bitbucket pull requests from a git working copy")]
pub struct Cli {
    /// Configuration file to read instead of ~/.config/ket
    #[arg(long, env = "KET_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bitbucket username (repository owner)
    #[arg(long, env = "KET_USERNAME", global = true)]
    pub username: Option<String>,

    /// Bitbucket API key or app password
    #[arg(long, env = "KET_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Bitbucket API base URL
    #[arg(long, env = "KET_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage pull requests
    #[command(name = "pull-request", visible_alias = "pr", subcommand)]
    PullRequest(PullRequestCommand),
}

/// Pull request subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum PullRequestCommand {
    /// List pull requests
    List {
        /// State to include; repeat for several
        #[arg(short = 's', long = "state", value_enum, default_value = "open")]
        states: Vec<StateFilter>,
    },

    /// Show a pull request
    Show {
        /// Pull request ID
        id: u64,
    },

    /// Create a pull request from the current branch
    Create {
        /// Branch to merge into
        #[arg(short = 't', long, default_value = "master")]
        target_branch: String,

        /// Title on first use, description lines after; opens the editor when absent
        #[arg(short = 'm', long = "message")]
        messages: Vec<String>,
    },

    /// Decline a pull request
    Close {
        /// Pull request ID
        id: u64,
    },

    /// Merge a pull request
    Merge {
        /// Pull request ID
        id: u64,
    },

    /// Approve a pull request
    Approve {
        /// Pull request ID
        id: u64,
    },

    /// Withdraw an approval
    Unapprove {
        /// Pull request ID
        id: u64,
    },

    /// Print the diff of a pull request
    Diff {
        /// Pull request ID
        id: u64,
    },

    /// Fetch and check out the source branch of a pull request
    Checkout {
        /// Pull request ID
        id: u64,
    },
}

/// Errors reported by the binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A repository operation failed.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// Writing output failed.
    #[error("failed to write output: {message}")]
    Io {
        /// I/O error detail.
        message: String,
    },
}

impl Cli {
    /// Returns the flag and environment layer of the configuration.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            username: non_blank(self.username.as_deref()),
            api_key: non_blank(self.api_key.as_deref()),
            api_url: non_blank(self.api_url.as_deref()),
        }
    }

    /// Loads the configuration file and applies flag and environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but is unusable.
    pub fn load_config(&self) -> Result<KetConfig, ConfigError> {
        let file_layer = self
            .config
            .as_deref()
            .map_or_else(KetConfig::load_default, KetConfig::load_from_path)?;
        Ok(file_layer.with_overrides(self.overrides()))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToOwned::to_owned)
}

/// Runs the parsed command against the repository in the current directory.
///
/// # Errors
///
/// Returns [`CliError`] when configuration, the repository or output fails.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    let repo = Repo::open(Path::new("."), &config)?;
    tracing::debug!(owner = repo.username(), slug = repo.slug(), "repository ready");

    match &cli.command {
        Command::PullRequest(command) => pull_request::run(&repo, command),
    }
}

#[cfg(test)]
mod tests;
