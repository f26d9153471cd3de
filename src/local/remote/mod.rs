//! Repository slug derivation from git remote URLs.

use super::error::LocalRepositoryError;

/// Derives the Bitbucket repository slug from a remote URL.
///
/// The slug is the last `/`-separated segment of the URL with any `.git`
/// suffix removed, so both `git@bitbucket.org:team/my-repo.git` and
/// `https://bitbucket.org/team/my-repo` yield `my-repo`. A trailing `/` is
/// ignored.
///
/// # Errors
///
/// Returns [`LocalRepositoryError::InvalidRemoteUrl`] when the URL contains
/// no `/` or the resulting slug is empty.
pub fn derive_slug(remote_url: &str) -> Result<String, LocalRepositoryError> {
    let invalid = || LocalRepositoryError::InvalidRemoteUrl {
        url: remote_url.to_owned(),
    };

    let trimmed = remote_url.trim().trim_end_matches('/');
    let (_, last_segment) = trimmed.rsplit_once('/').ok_or_else(invalid)?;
    let slug = last_segment.strip_suffix(".git").unwrap_or(last_segment);

    if slug.is_empty() {
        return Err(invalid());
    }
    Ok(slug.to_owned())
}

#[cfg(test)]
mod tests;
