//! Unit tests for slug derivation.

use rstest::rstest;

use super::super::error::LocalRepositoryError;
use super::derive_slug;

#[rstest]
#[case::ssh_scp_style("git@host:team/my-repo.git", "my-repo")]
#[case::bitbucket_ssh("git@bitbucket.org:team/my-repo.git", "my-repo")]
#[case::https("https://bitbucket.org/team/my-repo.git", "my-repo")]
#[case::https_no_git_suffix("https://bitbucket.org/team/my-repo", "my-repo")]
#[case::https_with_user("https://user@bitbucket.org/team/my-repo.git", "my-repo")]
#[case::trailing_slash("https://bitbucket.org/team/my-repo/", "my-repo")]
#[case::dotted_name("git@bitbucket.org:team/my.repo.git", "my.repo")]
#[case::local_path("/srv/git/project.git", "project")]
fn derive_slug_takes_last_segment(#[case] url: &str, #[case] expected: &str) {
    let slug = derive_slug(url).expect("slug should be derived");

    assert_eq!(slug, expected);
}

#[rstest]
#[case::no_slash("my-repo")]
#[case::scp_without_path("git@host:my-repo.git")]
#[case::empty("")]
#[case::only_git_suffix("git@host:team/.git")]
fn derive_slug_rejects_urls_without_a_path(#[case] url: &str) {
    let result = derive_slug(url);

    assert!(
        matches!(result, Err(LocalRepositoryError::InvalidRemoteUrl { .. })),
        "expected InvalidRemoteUrl for '{url}', got {result:?}"
    );
}
