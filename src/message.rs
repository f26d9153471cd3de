//! Pull request message editing and parsing.
//!
//! A message is free text in the style of a git commit message: the first
//! meaningful line is the title, everything after it is the description, and
//! lines starting with `#` are comments.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

const COMMENT_PREFIX: char = '#';

/// Errors raised while collecting a message through an external editor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageError {
    /// The temporary message file could not be prepared or read back.
    #[error("could not prepare pull request message file: {message}")]
    Io {
        /// I/O error detail.
        message: String,
    },

    /// The editor could not be started.
    #[error("could not launch editor '{editor}': {message}")]
    Launch {
        /// Editor command.
        editor: String,
        /// Spawn error detail.
        message: String,
    },

    /// The editor exited unsuccessfully.
    #[error("editor '{editor}' exited with {status}")]
    EditorFailed {
        /// Editor command.
        editor: String,
        /// Exit status description.
        status: String,
    },
}

/// Title and description parsed from free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestMessage {
    /// First non-comment, non-blank line, trimmed. `None` aborts creation.
    pub title: Option<String>,
    /// Remaining non-comment lines joined and trimmed; `None` when empty.
    pub description: Option<String>,
}

impl PullRequestMessage {
    /// Parses message lines. Trailing line terminators are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ket::message::PullRequestMessage;
    ///
    /// let message = PullRequestMessage::parse(&["# comment", "Title", "", "Body"]);
    /// assert_eq!(message.title.as_deref(), Some("Title"));
    /// assert_eq!(message.description.as_deref(), Some("Body"));
    /// ```
    #[must_use]
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut content = lines
            .iter()
            .map(|line| line.as_ref().trim_end_matches(['\n', '\r']))
            .filter(|line| !line.starts_with(COMMENT_PREFIX));

        let title = content
            .by_ref()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(ToOwned::to_owned);

        let body = content.collect::<Vec<_>>().join("\n");
        let trimmed = body.trim();
        let description = (!trimmed.is_empty()).then(|| trimmed.to_owned());

        Self { title, description }
    }
}

/// Builds the commented template shown in the editor.
#[must_use]
pub fn message_template(source_branch: &str, target_branch: &str) -> String {
    format!(
        concat!(
            "\n",
            "# Please enter the pull request title on the first line and an\n",
            "# optional description below it. Lines starting with '#' are\n",
            "# ignored, and an empty title aborts the pull request.\n",
            "#\n",
            "# Source branch: {source}\n",
            "# Target branch: {target}\n",
        ),
        source = source_branch,
        target = target_branch,
    )
}

/// Lets the user edit `template` in `editor` and returns the edited lines.
///
/// The text lives in a temporary file that is removed when this function
/// returns, whether or not the editor succeeded. The editor command is run
/// through the shell so that values such as `code --wait` work.
///
/// # Errors
///
/// Returns [`MessageError`] when the file cannot be written or read, the
/// editor cannot be started, or it exits unsuccessfully.
pub fn edit_pull_request_message(
    editor: &str,
    template: &str,
) -> Result<Vec<String>, MessageError> {
    let mut file = tempfile::Builder::new()
        .prefix("KET_PULLREQ_EDITMSG")
        .tempfile()
        .map_err(|error| io_error(&error))?;
    file.write_all(template.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|error| io_error(&error))?;

    tracing::debug!(editor, path = %file.path().display(), "launching editor");
    run_editor(editor, file.path())?;

    let contents = fs::read_to_string(file.path()).map_err(|error| io_error(&error))?;
    Ok(contents.lines().map(ToOwned::to_owned).collect())
}

fn run_editor(editor: &str, path: &Path) -> Result<(), MessageError> {
    let status = editor_command(editor, path)
        .status()
        .map_err(|error| MessageError::Launch {
            editor: editor.to_owned(),
            message: error.to_string(),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(MessageError::EditorFailed {
            editor: editor.to_owned(),
            status: status.to_string(),
        })
    }
}

#[cfg(unix)]
fn editor_command(editor: &str, path: &Path) -> Command {
    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(format!("{editor} \"$@\""))
        .arg(editor)
        .arg(path);
    command
}

#[cfg(not(unix))]
fn editor_command(editor: &str, path: &Path) -> Command {
    let mut command = Command::new(editor);
    command.arg(path);
    command
}

fn io_error(error: &std::io::Error) -> MessageError {
    MessageError::Io {
        message: error.to_string(),
    }
}
