//! Pipe table recognition.
//!
//! Tables are not a block construct of their own. A finished paragraph
//! is offered to `try_parse` at render time: the first line is the
//! header row, the second the alignment row, the rest body rows. Any
//! malformed row hands the paragraph back unchanged.

/// Column alignment from the delimiter row's colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Value for the cell's `align` attribute, if any.
    pub fn attr(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// A recognized table: header cells, per-column alignment, body rows.
/// Cell text is still raw and goes through the inline pipeline later.
#[derive(Debug, PartialEq)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Interpret a paragraph's text as a table. Returns `None` when the
/// text is not a well-formed table: fewer than two lines, a single
/// column, an invalid delimiter row, or any row whose cell count
/// differs from the header.
pub fn try_parse(text: &str) -> Option<Table> {
    let mut lines = text.lines();
    let header_line = lines.next()?;
    let delim_line = lines.next()?;
    if !header_line.contains('|') || !delim_line.contains('|') {
        return None;
    }

    let header = split_row(header_line);
    if header.len() < 2 {
        return None;
    }

    let delim = split_row(delim_line);
    if delim.len() != header.len() {
        return None;
    }
    let alignments = delim
        .iter()
        .map(|cell| parse_alignment(cell))
        .collect::<Option<Vec<_>>>()?;

    let mut rows = Vec::new();
    for line in lines {
        let cells = split_row(line);
        if cells.len() != header.len() {
            return None;
        }
        rows.push(cells);
    }

    Some(Table {
        alignments,
        header,
        rows,
    })
}

/// `:---`, `---:`, `:---:`, or bare dashes. Anything else rejects the
/// whole table.
fn parse_alignment(cell: &str) -> Option<Alignment> {
    let left = cell.starts_with(':');
    let right = cell.ends_with(':') && cell.len() > 1;
    let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];
    if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
        return None;
    }
    Some(match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    })
}

/// Split one row on unescaped pipes outside backtick spans, trimming
/// each cell. Outer pipes produce empty edge cells, which are dropped.
pub fn split_row(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.trim().chars().collect();
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut open_backticks = 0usize;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' if chars.get(i + 1) == Some(&'|') => {
                cell.push('\\');
                cell.push('|');
                i += 2;
            }
            '`' => {
                let mut run = 1;
                while chars.get(i + run) == Some(&'`') {
                    run += 1;
                }
                for _ in 0..run {
                    cell.push('`');
                }
                i += run;
                if open_backticks == 0 {
                    open_backticks = run;
                } else if open_backticks == run {
                    open_backticks = 0;
                }
            }
            '|' if open_backticks == 0 => {
                cells.push(cell.trim().to_string());
                cell = String::new();
                i += 1;
            }
            c => {
                cell.push(c);
                i += 1;
            }
        }
    }
    cells.push(cell.trim().to_string());

    if cells.len() > 1 && cells.first().is_some_and(String::is_empty) {
        cells.remove(0);
    }
    if cells.len() > 1 && cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_rows() {
        assert_eq!(split_row("a | b | c"), vec!["a", "b", "c"]);
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
    }

    #[test]
    fn keeps_escaped_and_code_span_pipes() {
        assert_eq!(split_row("a \\| b | c"), vec!["a \\| b", "c"]);
        assert_eq!(split_row("`a | b` | c"), vec!["`a | b`", "c"]);
    }

    #[test]
    fn empty_interior_cells_survive() {
        assert_eq!(split_row("a || b"), vec!["a", "", "b"]);
    }

    #[test]
    fn parses_basic_table() {
        let t = try_parse("a | b\n--- | ---\n1 | 2\n").unwrap();
        assert_eq!(t.header, vec!["a", "b"]);
        assert_eq!(t.alignments, vec![Alignment::None, Alignment::None]);
        assert_eq!(t.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn parses_alignments() {
        let t = try_parse("a | b | c | d\n:-- | :-: | --: | ---\n").unwrap();
        assert_eq!(
            t.alignments,
            vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::None
            ]
        );
        assert!(t.rows.is_empty());
    }

    #[test]
    fn single_column_is_not_a_table() {
        assert!(try_parse("a\n---\n").is_none());
        assert!(try_parse("a|b\n---\n").is_none());
    }

    #[test]
    fn row_count_mismatch_rejects() {
        assert!(try_parse("a | b\n--- | ---\nonly one\n").is_none());
    }

    #[test]
    fn bad_delimiter_rejects() {
        assert!(try_parse("a | b\n--- | -x-\n1 | 2\n").is_none());
        assert!(try_parse("a | b\nc | d\n").is_none());
    }
}
