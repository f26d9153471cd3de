//! Local git working copy access.
//!
//! This module discovers the repository containing the current directory,
//! derives the Bitbucket repository slug from its remote, and performs the
//! handful of git operations the CLI needs (current branch, fetch, checkout,
//! editor lookup).
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ket::local::LocalRepository;
//!
//! let repo = LocalRepository::discover(Path::new(".")).expect("not a git repository");
//! let remote = repo.remote().expect("no remote configured");
//! println!("slug: {}", remote.slug().expect("unusable remote URL"));
//! ```

mod discovery;
mod error;
mod git_ops;
mod remote;

pub use discovery::{LocalRepository, RemoteInfo};
pub use error::LocalRepositoryError;
pub use git_ops::GitOperations;
pub use remote::derive_slug;

#[cfg(test)]
pub use git_ops::MockGitOperations;
