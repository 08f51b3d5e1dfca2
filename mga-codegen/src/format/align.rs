//! Elastic tabstops over printed lines.
//!
//! Lines are split into cells. Consecutive lines that share a terminated cell
//! in a column form a column block whose cells are padded to a common width;
//! the rule is applied recursively to the columns on the right. Indentation
//! is a run of leading empty cells that always expand to tabs.

const TAB_WIDTH: usize = 8;
const PADDING: usize = 1;

/// A terminated cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Terminated by a hard tab: never discarded when empty.
    pub hard: bool,
}

/// A printed line: leading indentation, aligned cells and the unaligned
/// remainder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub indent: usize,
    pub cells: Vec<Cell>,
    pub text: String,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.cells.is_empty() && self.text.is_empty()
    }
}

/// Output unit; a flush ends every column block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Line(Line),
    Flush,
}

struct Row {
    cells: Vec<(String, usize, bool)>,
}

impl Row {
    fn from_line(line: &Line) -> Self {
        let mut cells = Vec::with_capacity(line.indent + line.cells.len() + 1);
        if !line.is_blank() {
            cells.extend((0..line.indent).map(|_| (String::new(), 0, true)));
        }
        for cell in &line.cells {
            cells.push((cell.text.clone(), width(&cell.text), cell.hard));
        }
        cells.push((line.text.clone(), width(&line.text), false));
        Self { cells }
    }
}

/// Lay out all chunks into the final text.
pub fn align(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    let mut section = Vec::new();
    for chunk in chunks {
        match chunk {
            Chunk::Line(line) => section.push(Row::from_line(line)),
            Chunk::Flush => {
                write_section(&section, &mut out);
                section.clear();
            }
        }
    }
    write_section(&section, &mut out);
    out
}

fn write_section(rows: &[Row], out: &mut String) {
    if rows.is_empty() {
        return;
    }
    let mut writer = Writer {
        rows,
        widths: Vec::new(),
        out,
    };
    writer.format(0, rows.len());
}

struct Writer<'a> {
    rows: &'a [Row],
    widths: Vec<usize>,
    out: &'a mut String,
}

impl Writer<'_> {
    fn format(&mut self, mut line0: usize, line1: usize) {
        let column = self.widths.len();
        let mut this = line0;
        while this < line1 {
            if column + 1 >= self.rows[this].cells.len() {
                this += 1;
                continue;
            }

            self.write_lines(line0, this);
            line0 = this;

            let mut width = 0;
            let mut discardable = true;
            while this < line1 {
                let row = &self.rows[this];
                if column + 1 >= row.cells.len() {
                    break;
                }
                let (_, cell_width, hard) = row.cells[column];
                width = width.max(cell_width + PADDING);
                if cell_width > 0 || hard {
                    discardable = false;
                }
                this += 1;
            }
            if discardable {
                width = 0;
            }

            self.widths.push(width);
            self.format(line0, this);
            self.widths.pop();
            line0 = this;
        }
        self.write_lines(line0, line1);
    }

    fn write_lines(&mut self, line0: usize, line1: usize) {
        for row in &self.rows[line0..line1] {
            let start = self.out.len();
            let mut use_tabs = true;
            for (j, (text, cell_width, _)) in row.cells.iter().enumerate() {
                if text.is_empty() {
                    if let Some(&column) = self.widths.get(j) {
                        pad(self.out, 0, column, use_tabs);
                    }
                } else {
                    use_tabs = false;
                    self.out.push_str(text);
                    if let Some(&column) = self.widths.get(j) {
                        pad(self.out, *cell_width, column, false);
                    }
                }
            }
            let trimmed = self.out[start..].trim_end_matches([' ', '\t']).len();
            self.out.truncate(start + trimmed);
            self.out.push('\n');
        }
    }
}

fn pad(out: &mut String, text_width: usize, cell_width: usize, use_tabs: bool) {
    if use_tabs {
        let cell_width = cell_width.div_ceil(TAB_WIDTH) * TAB_WIDTH;
        let n = cell_width.saturating_sub(text_width);
        out.extend(std::iter::repeat_n('\t', n.div_ceil(TAB_WIDTH)));
    } else {
        out.extend(std::iter::repeat_n(' ', cell_width.saturating_sub(text_width)));
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(indent: usize, cells: &[&str], text: &str) -> Chunk {
        Chunk::Line(Line {
            indent,
            cells: cells
                .iter()
                .map(|c| Cell {
                    text: c.to_string(),
                    hard: false,
                })
                .collect(),
            text: text.to_string(),
        })
    }

    #[test]
    fn test_aligns_consecutive_cells() {
        let out = align(&[line(1, &["Err:"], "err,"), line(1, &["Response:"], "response,")]);
        assert_eq!(out, "\tErr:      err,\n\tResponse: response,\n");
    }

    #[test]
    fn test_flush_breaks_alignment() {
        let out = align(&[line(0, &["a"], "1"), Chunk::Flush, line(0, &["long"], "2")]);
        assert_eq!(out, "a 1\nlong 2\n");
    }

    #[test]
    fn test_line_without_cell_breaks_block() {
        let out = align(&[
            line(0, &["a"], "1"),
            line(0, &[], "plain"),
            line(0, &["long"], "2"),
        ]);
        assert_eq!(out, "a 1\nplain\nlong 2\n");
    }

    #[test]
    fn test_empty_soft_column_is_discarded() {
        let out = align(&[line(0, &["a", ""], "= 1"), line(0, &["bb", ""], "= 2")]);
        assert_eq!(out, "a  = 1\nbb = 2\n");
    }

    #[test]
    fn test_nested_columns() {
        let out = align(&[
            line(1, &["A", "int"], "// a"),
            line(1, &["Beta", "string"], "// b"),
        ]);
        assert_eq!(out, "\tA    int    // a\n\tBeta string // b\n");
    }

    #[test]
    fn test_blank_line_has_no_indentation() {
        let out = align(&[line(1, &[], "x"), Chunk::Line(Line::default()), line(1, &[], "y")]);
        assert_eq!(out, "\tx\n\n\ty\n");
    }
}
