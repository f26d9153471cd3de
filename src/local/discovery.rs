//! Local git working copy discovery.
//!
//! Finds the repository containing a directory and answers the read-only
//! questions the CLI asks of it: which remote to use and which branch is
//! checked out.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};

use super::error::LocalRepositoryError;
use super::remote::derive_slug;

/// Remote preferred when several are configured.
const DEFAULT_REMOTE_NAME: &str = "origin";

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// A discovered local git working copy.
pub struct LocalRepository {
    repo: Repository,
    workdir: PathBuf,
}

impl fmt::Debug for LocalRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalRepository")
            .field("repo", &"<git2::Repository>")
            .field("workdir", &self.workdir)
            .finish()
    }
}

/// The remote the CLI talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// Configured fetch URL.
    pub url: String,
}

impl RemoteInfo {
    /// Derives the repository slug from the remote URL.
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::InvalidRemoteUrl`] when the URL has no
    /// usable path segment.
    pub fn slug(&self) -> Result<String, LocalRepositoryError> {
        derive_slug(&self.url)
    }
}

impl LocalRepository {
    /// Discovers the working copy containing `start_path`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::NotARepository`] when no repository is
    /// found or the repository is bare.
    pub fn discover(start_path: &Path) -> Result<Self, LocalRepositoryError> {
        let repo = Repository::discover(start_path).map_err(|error| {
            if error.code() == ErrorCode::NotFound {
                LocalRepositoryError::NotARepository
            } else {
                LocalRepositoryError::from(error)
            }
        })?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or(LocalRepositoryError::NotARepository)?;

        tracing::debug!(workdir = %workdir.display(), "discovered git repository");
        Ok(Self { repo, workdir })
    }

    /// Returns the working directory.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Returns `origin` if configured, otherwise the first remote.
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::NoRemotes`] when no remote exists.
    pub fn remote(&self) -> Result<RemoteInfo, LocalRepositoryError> {
        let remotes = self.repo.remotes()?;
        let name = if remotes.iter().flatten().any(|name| name == DEFAULT_REMOTE_NAME) {
            DEFAULT_REMOTE_NAME
        } else {
            remotes
                .iter()
                .flatten()
                .next()
                .ok_or(LocalRepositoryError::NoRemotes)?
        };

        let remote = self.repo.find_remote(name)?;
        let url = remote
            .url()
            .ok_or_else(|| LocalRepositoryError::InvalidRemoteUrl {
                url: "(no URL)".to_owned(),
            })?;

        Ok(RemoteInfo {
            name: name.to_owned(),
            url: url.to_owned(),
        })
    }

    /// Returns the name of the checked-out branch.
    ///
    /// A freshly initialised repository has no commits, so its branch is
    /// read from the symbolic `HEAD` reference instead.
    ///
    /// # Errors
    ///
    /// Returns [`LocalRepositoryError::DetachedHead`] when `HEAD` is not a
    /// branch.
    pub fn head_branch(&self) -> Result<String, LocalRepositoryError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(ToOwned::to_owned)
                .ok_or(LocalRepositoryError::DetachedHead),
            Ok(_) => Err(LocalRepositoryError::DetachedHead),
            Err(error) if error.code() == ErrorCode::UnbornBranch => self.unborn_branch(),
            Err(error) => Err(error.into()),
        }
    }

    fn unborn_branch(&self) -> Result<String, LocalRepositoryError> {
        let head = self.repo.find_reference("HEAD")?;
        head.symbolic_target()
            .and_then(|target| target.strip_prefix(BRANCH_REF_PREFIX))
            .map(ToOwned::to_owned)
            .ok_or(LocalRepositoryError::DetachedHead)
    }
}
