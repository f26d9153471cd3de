//! Plain-text tables for terminal output.
//!
//! Tables use the "simple" layout: columns separated by two spaces, a dashed
//! rule under the header row, and integer columns aligned to the right. A
//! table without headers is framed by a rule above and below, which suits
//! key/value listings.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Left,
    Right,
}

/// Rows of display-ready cells with optional headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with a header row.
    #[must_use]
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: Some(headers.into_iter().map(Into::into).collect()),
            rows: Vec::new(),
        }
    }

    /// Creates an empty table without headers.
    #[must_use]
    pub const fn headerless() -> Self {
        Self {
            headers: None,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing trailing cells render as blanks.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Returns the header row, if any.
    #[must_use]
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Returns the body rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the cell at `row`, `column`, if present.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Renders the table. Lines carry no trailing whitespace.
    #[must_use]
    pub fn render(&self) -> String {
        let column_count = self.column_count();
        if column_count == 0 {
            return String::new();
        }

        let widths: Vec<usize> = (0..column_count)
            .map(|column| self.column_width(column))
            .collect();
        let alignments: Vec<Alignment> = (0..column_count)
            .map(|column| self.column_alignment(column))
            .collect();
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);

        let mut lines = Vec::new();
        if let Some(headers) = &self.headers {
            render_row(&mut lines, headers, &widths, &alignments);
            lines.push(rule);
            for row in &self.rows {
                render_row(&mut lines, row, &widths, &alignments);
            }
        } else {
            lines.push(rule.clone());
            for row in &self.rows {
                render_row(&mut lines, row, &widths, &alignments);
            }
            lines.push(rule);
        }
        lines.join("\n")
    }

    /// Writes the rendered table followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.render())
    }

    fn column_count(&self) -> usize {
        self.headers
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    fn column_width(&self, column: usize) -> usize {
        self.headers
            .iter()
            .chain(self.rows.iter())
            .map(|row| display_width(cell_text(row, column)))
            .max()
            .unwrap_or(0)
    }

    fn column_alignment(&self, column: usize) -> Alignment {
        let mut values = self
            .rows
            .iter()
            .map(|row| cell_text(row, column))
            .filter(|value| !value.is_empty())
            .peekable();

        if values.peek().is_some() && values.all(|value| value.parse::<i64>().is_ok()) {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }
}

fn cell_text(row: &[String], column: usize) -> &str {
    row.get(column).map_or("", String::as_str)
}

/// Widest line of a possibly multi-line cell.
fn display_width(text: &str) -> usize {
    text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn render_row(lines: &mut Vec<String>, row: &[String], widths: &[usize], alignments: &[Alignment]) {
    let cells: Vec<Vec<&str>> = widths
        .iter()
        .enumerate()
        .map(|(column, _)| cell_text(row, column).lines().collect())
        .collect();
    let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

    for line_index in 0..height {
        let line = cells
            .iter()
            .zip(widths)
            .zip(alignments)
            .map(|((cell_lines, width), alignment)| {
                let text = cell_lines.get(line_index).copied().unwrap_or("");
                pad(text, *width, *alignment)
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        lines.push(line.trim_end().to_owned());
    }
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let fill = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(text)));
    match alignment {
        Alignment::Left => format!("{text}{fill}"),
        Alignment::Right => format!("{fill}{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::Table;

    #[test]
    fn renders_header_rule_and_rows() {
        let mut table = Table::with_headers(["ID", "State", "Title"]);
        table.push_row(["7", "open", "Add login"]);
        table.push_row(["12", "merged", "Fix typo"]);

        let expected = concat!(
            "ID  State   Title\n",
            "--  ------  ---------\n",
            " 7  open    Add login\n",
            "12  merged  Fix typo",
        );
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn empty_table_renders_header_only() {
        let table = Table::with_headers(["ID", "Title"]);

        assert_eq!(table.render(), "ID  Title\n--  -----");
    }

    #[test]
    fn headerless_table_is_framed_by_rules() {
        let mut table = Table::headerless();
        table.push_row(["ID", "42"]);
        table.push_row(["Title", "Fix"]);

        let expected = concat!(
            "-----  ---\n",
            "ID     42\n",
            "Title  Fix\n",
            "-----  ---",
        );
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn multi_line_cells_span_lines() {
        let mut table = Table::headerless();
        table.push_row(["Description", "Line one\nLine two"]);
        table.push_row(["State", "open"]);

        let expected = concat!(
            "-----------  --------\n",
            "Description  Line one\n",
            "             Line two\n",
            "State        open\n",
            "-----------  --------",
        );
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn wide_characters_use_display_width() {
        let mut table = Table::with_headers(["Author", "ID"]);
        table.push_row(["日本", "1"]);
        table.push_row(["ab", "10"]);

        let expected = concat!(
            "Author  ID\n",
            "------  --\n",
            "日本     1\n",
            "ab      10",
        );
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn short_rows_render_blank_cells() {
        let mut table = Table::with_headers(["A", "B"]);
        table.push_row(["x"]);

        assert_eq!(table.render(), "A  B\n-  -\nx");
        assert_eq!(table.cell(0, 1), None);
    }

    #[test]
    fn table_without_columns_renders_nothing() {
        assert_eq!(Table::headerless().render(), "");
    }

    #[test]
    fn write_to_appends_newline() {
        let mut table = Table::with_headers(["ID"]);
        table.push_row(["1"]);
        let mut buffer = Vec::new();

        table.write_to(&mut buffer).expect("writing to a Vec should succeed");

        assert_eq!(
            String::from_utf8(buffer).expect("output should be UTF-8"),
            "ID\n--\n 1\n"
        );
    }
}
