//! Column-aligned table writer with colored, multi-line cells.
//!
//! Cells are staged with [`ColorTableWriter::add_cell`] and turned into
//! physical lines by [`ColorTableWriter::flush_row`]: line `k` of a row holds
//! line `k` of every cell, and cells that ran out of lines get an empty,
//! uncolored placeholder. Nothing reaches the sink until
//! [`ColorTableWriter::flush_table`], because column widths depend on every
//! row.

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io::{self, Write};

/// Spaces between columns.
const COLUMN_GAP: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    None,
    Green,
    LightBlue,
}

impl Color {
    // Dark green (SGR 32) and bright blue (SGR 94), emitted by comfy-table as
    // 256-colour indices 2 and 12.
    fn cell(self, text: &str) -> Cell {
        let cell = Cell::new(text);
        match self {
            Color::None => cell,
            Color::Green => cell.fg(comfy_table::Color::DarkGreen),
            Color::LightBlue => cell.fg(comfy_table::Color::Blue),
        }
    }
}

struct StagedCell {
    color: Color,
    lines: Vec<String>,
}

pub struct ColorTableWriter<W: Write> {
    out: W,
    /// Rows with fewer cells are left-padded with empty cells up to this.
    columns: usize,
    current_row: Vec<StagedCell>,
    table: Table,
    lines: usize,
}

impl<W: Write> ColorTableWriter<W> {
    pub fn new(out: W, columns: usize) -> Self {
        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled)
            .enforce_styling();

        Self {
            out,
            columns,
            current_row: Vec::new(),
            table,
            lines: 0,
        }
    }

    /// Stage a cell on the current row. `text` may span several lines.
    pub fn add_cell(&mut self, color: Color, text: &str) {
        self.current_row.push(StagedCell {
            color,
            lines: text.split('\n').map(str::to_string).collect(),
        });
    }

    /// Lay out the staged row and start a new one. An empty row becomes a
    /// blank separator line.
    pub fn flush_row(&mut self) {
        let height = self
            .current_row
            .iter()
            .map(|cell| cell.lines.len())
            .max()
            .unwrap_or(1);
        let padding = self.columns.saturating_sub(self.current_row.len());

        for line in 0..height {
            let mut cells: Vec<Cell> = (0..padding).map(|_| Cell::new("")).collect();
            cells.extend(self.current_row.iter().map(|cell| match cell.lines.get(line) {
                Some(text) => cell.color.cell(text),
                None => Cell::new(""),
            }));
            self.table.add_row(cells);
            self.lines += 1;
        }

        self.current_row.clear();
    }

    /// Write the whole table to the sink.
    pub fn flush_table(mut self) -> io::Result<()> {
        if self.lines > 0 {
            for column in self.table.column_iter_mut() {
                column.set_padding((0, COLUMN_GAP));
            }
            if let Some(last) = self.table.column_iter_mut().last() {
                last.set_padding((0, 0));
            }
            // Shorter cells are still padded to the column width.
            for line in self.table.to_string().lines() {
                writeln!(self.out, "{}", line.trim_end())?;
            }
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn strip_ansi(s: &str) -> String {
        Regex::new(r"\x1b\[[0-9;]*m").unwrap().replace_all(s, "").into_owned()
    }

    fn render(build: impl FnOnce(&mut ColorTableWriter<&mut Vec<u8>>), columns: usize) -> String {
        let mut out = Vec::new();
        let mut w = ColorTableWriter::new(&mut out, columns);
        build(&mut w);
        w.flush_table().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn multi_line_cells_span_physical_lines() {
        let output = render(
            |w| {
                w.add_cell(Color::None, "a1");
                w.add_cell(Color::None, "b1\nb2\nb3");
                w.add_cell(Color::None, "c1\nc2");
                w.flush_row();
            },
            0,
        );
        let plain = strip_ansi(&output);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("a1"));
        assert!(lines[1].trim_start().starts_with("b2"));
        assert!(lines[1].contains("c2"));
        assert!(lines[2].trim_start().starts_with("b3"));
        assert!(!lines[2].contains('c'));
    }

    #[test]
    fn columns_are_aligned() {
        let output = render(
            |w| {
                w.add_cell(Color::Green, "short");
                w.add_cell(Color::None, "x");
                w.flush_row();
                w.add_cell(Color::LightBlue, "much-longer");
                w.add_cell(Color::None, "y");
                w.flush_row();
            },
            0,
        );
        let plain = strip_ansi(&output);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines[0].find('x'), lines[1].find('y'));
    }

    #[test]
    fn short_rows_are_left_padded() {
        let output = render(
            |w| {
                w.add_cell(Color::LightBlue, "Group");
                w.add_cell(Color::Green, "name");
                w.flush_row();
                w.add_cell(Color::Green, "other");
                w.flush_row();
            },
            3,
        );
        let plain = strip_ansi(&output);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines[0].find("name"), lines[1].find("other"));
        assert!(lines[0].find("Group") < lines[0].find("name"));
    }

    #[test]
    fn empty_row_is_blank_separator() {
        let output = render(
            |w| {
                w.add_cell(Color::None, "row");
                w.flush_row();
                w.flush_row();
                w.add_cell(Color::None, "next");
                w.flush_row();
            },
            2,
        );
        let plain = strip_ansi(&output);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim().is_empty());
    }

    #[test]
    fn colors_are_emitted() {
        let output = render(
            |w| {
                w.add_cell(Color::Green, "build");
                w.flush_row();
            },
            0,
        );
        assert!(output.contains('\x1b'));
        assert!(output.contains("build"));
    }

    #[test]
    fn lines_have_no_trailing_whitespace() {
        let output = render(
            |w| {
                w.add_cell(Color::LightBlue, "Group");
                w.add_cell(Color::Green, "name");
                w.add_cell(Color::None, "line one\nsecond, longer line");
                w.flush_row();
                w.add_cell(Color::Green, "other");
                w.add_cell(Color::None, "x");
                w.flush_row();
                w.flush_row();
            },
            4,
        );
        assert_eq!(output.lines().count(), 4);
        for line in output.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
        }
        assert_eq!(output.lines().last(), Some(""));
    }

    #[test]
    fn empty_table_writes_nothing() {
        assert_eq!(render(|_| {}, 4), "");
    }
}
