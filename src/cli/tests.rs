//! Argument parsing and configuration layering tests.

use std::fs;

use clap::{CommandFactory, Parser};
use ket::bitbucket::StateFilter;
use rstest::rstest;
use tempfile::TempDir;

use super::{Cli, Command, PullRequestCommand};

const KET_ENV: [(&str, Option<&str>); 4] = [
    ("KET_CONFIG", None),
    ("KET_USERNAME", None),
    ("KET_API_KEY", None),
    ("KET_API_URL", None),
];

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments should parse")
}

fn pull_request_command(cli: Cli) -> PullRequestCommand {
    match cli.command {
        Command::PullRequest(command) => command,
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[rstest]
#[case::full_name("pull-request")]
#[case::alias("pr")]
fn list_defaults_to_open(#[case] group: &str) {
    let _guard = env_lock::lock_env(KET_ENV);

    let command = pull_request_command(parse(&["ket", group, "list"]));

    assert_eq!(
        command,
        PullRequestCommand::List {
            states: vec![StateFilter::Open]
        }
    );
}

#[test]
fn list_accepts_repeated_states() {
    let _guard = env_lock::lock_env(KET_ENV);

    let command = pull_request_command(parse(&[
        "ket", "pull-request", "list", "-s", "merged", "--state", "declined",
    ]));

    assert_eq!(
        command,
        PullRequestCommand::List {
            states: vec![StateFilter::Merged, StateFilter::Declined]
        }
    );
}

#[test]
fn list_rejects_unknown_state() {
    let result = Cli::try_parse_from(["ket", "pull-request", "list", "-s", "draft"]);

    assert!(result.is_err());
}

#[test]
fn create_defaults_to_master_without_messages() {
    let _guard = env_lock::lock_env(KET_ENV);

    let command = pull_request_command(parse(&["ket", "pull-request", "create"]));

    assert_eq!(
        command,
        PullRequestCommand::Create {
            target_branch: "master".to_owned(),
            messages: Vec::new(),
        }
    );
}

#[test]
fn create_collects_messages_in_order() {
    let _guard = env_lock::lock_env(KET_ENV);

    let command = pull_request_command(parse(&[
        "ket",
        "pull-request",
        "create",
        "-t",
        "develop",
        "-m",
        "Title",
        "--message",
        "Body",
    ]));

    assert_eq!(
        command,
        PullRequestCommand::Create {
            target_branch: "develop".to_owned(),
            messages: vec!["Title".to_owned(), "Body".to_owned()],
        }
    );
}

#[rstest]
#[case::show("show", PullRequestCommand::Show { id: 42 })]
#[case::close("close", PullRequestCommand::Close { id: 42 })]
#[case::merge("merge", PullRequestCommand::Merge { id: 42 })]
#[case::approve("approve", PullRequestCommand::Approve { id: 42 })]
#[case::unapprove("unapprove", PullRequestCommand::Unapprove { id: 42 })]
#[case::diff("diff", PullRequestCommand::Diff { id: 42 })]
#[case::checkout("checkout", PullRequestCommand::Checkout { id: 42 })]
fn id_commands_parse(#[case] name: &str, #[case] expected: PullRequestCommand) {
    let _guard = env_lock::lock_env(KET_ENV);

    let command = pull_request_command(parse(&["ket", "pull-request", name, "42"]));

    assert_eq!(command, expected);
}

#[test]
fn id_must_be_numeric() {
    assert!(Cli::try_parse_from(["ket", "pull-request", "show", "abc"]).is_err());
}

#[test]
fn global_flags_follow_subcommands() {
    let _guard = env_lock::lock_env(KET_ENV);

    let cli = parse(&[
        "ket",
        "pr",
        "list",
        "--username",
        "team",
        "--api-key",
        "secret",
        "-v",
    ]);

    assert!(cli.verbose);
    let overrides = cli.overrides();
    assert_eq!(overrides.username.as_deref(), Some("team"));
    assert_eq!(overrides.api_key.as_deref(), Some("secret"));
    assert_eq!(overrides.api_url, None);
}

#[test]
fn environment_supplies_credentials() {
    let _guard = env_lock::lock_env([
        ("KET_CONFIG", None),
        ("KET_USERNAME", Some("env-user")),
        ("KET_API_KEY", Some("env-key")),
        ("KET_API_URL", Some("http://localhost:1234")),
    ]);

    let overrides = parse(&["ket", "pr", "list"]).overrides();

    assert_eq!(overrides.username.as_deref(), Some("env-user"));
    assert_eq!(overrides.api_key.as_deref(), Some("env-key"));
    assert_eq!(overrides.api_url.as_deref(), Some("http://localhost:1234"));
}

#[test]
fn flags_win_over_environment() {
    let _guard = env_lock::lock_env([
        ("KET_CONFIG", None),
        ("KET_USERNAME", Some("env-user")),
        ("KET_API_KEY", None),
        ("KET_API_URL", None),
    ]);

    let overrides = parse(&["ket", "--username", "flag-user", "pr", "list"]).overrides();

    assert_eq!(overrides.username.as_deref(), Some("flag-user"));
}

#[test]
fn blank_values_are_ignored() {
    let _guard = env_lock::lock_env(KET_ENV);

    let overrides = parse(&["ket", "--username", "  ", "pr", "list"]).overrides();

    assert_eq!(overrides.username, None);
}

#[test]
fn load_config_layers_flags_over_file() {
    let dir = TempDir::new().expect("should create temp directory");
    let path = dir.path().join("ket.ini");
    fs::write(
        &path,
        "[bitbucket]\nusername = file-user\napi_key = file-key\n",
    )
    .expect("should write config");
    let path_text = path.to_string_lossy().into_owned();
    let _guard = env_lock::lock_env(KET_ENV);

    let cli = parse(&[
        "ket",
        "--config",
        &path_text,
        "--username",
        "flag-user",
        "pr",
        "list",
    ]);
    let config = cli.load_config().expect("config should load");

    assert_eq!(config.credentials.username.as_deref(), Some("flag-user"));
    assert_eq!(config.credentials.api_key.as_deref(), Some("file-key"));
}

#[test]
fn load_config_reports_malformed_file() {
    let dir = TempDir::new().expect("should create temp directory");
    let path = dir.path().join("ket.ini");
    fs::write(&path, "[bitbucket\nusername = x\n").expect("should write config");
    let path_text = path.to_string_lossy().into_owned();
    let _guard = env_lock::lock_env(KET_ENV);

    let cli = parse(&["ket", "--config", &path_text, "pr", "list"]);

    assert!(cli.load_config().is_err());
}
