//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use ket::output::Table;

use super::CliError;

/// Writes a table to stdout.
///
/// # Errors
///
/// Returns [`CliError::Io`] when stdout cannot be written.
pub fn write_table(table: &Table) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    write_table_to(&mut stdout, table)
}

/// Writes a table to the given writer.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the writer fails.
pub fn write_table_to<W: Write>(writer: &mut W, table: &Table) -> Result<(), CliError> {
    table.write_to(writer).map_err(|error| io_error(&error))
}

/// Writes a single line of text to stdout.
///
/// # Errors
///
/// Returns [`CliError::Io`] when stdout cannot be written.
pub fn write_line(text: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    write_line_to(&mut stdout, text)
}

/// Writes text followed by a newline to the given writer.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the writer fails.
pub fn write_line_to<W: Write>(writer: &mut W, text: &str) -> Result<(), CliError> {
    writeln!(writer, "{text}").map_err(|error| io_error(&error))
}

fn io_error(error: &io::Error) -> CliError {
    CliError::Io {
        message: error.to_string(),
    }
}
