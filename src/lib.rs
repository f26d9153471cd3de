//! Ket library crate for working with Bitbucket pull requests.
//!
//! The library discovers the git working copy the user is in, maps it to a
//! Bitbucket Cloud repository, and wraps the REST API with domain errors and
//! display-ready tables for the `ket` binary.

pub mod bitbucket;
pub mod config;
pub mod local;
pub mod message;
pub mod output;
pub mod repo;
pub mod telemetry;

pub use bitbucket::{BitbucketApi, BitbucketClient, BitbucketError, StateFilter};
pub use config::{ConfigError, KetConfig};
pub use local::{GitOperations, LocalRepository, LocalRepositoryError};
pub use output::Table;
pub use repo::{Repo, RepoError};
