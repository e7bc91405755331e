// src/report/table.rs
// =============================================================================
// Plain-text tables with box-drawing borders.
//
// Two styles:
// - fancy_grid: single lines with a header row, for the terminal
// - boxed: double lines, no header, for the TXT/PDF reports
//
// Widths are counted in chars, not bytes, so "→" or "é" don't throw the
// columns off.
// =============================================================================

// Border characters for one table style
struct Borders {
    top: [char; 4],    // left, fill, join, right
    header: [char; 4], // line under the header row
    middle: [char; 4], // line between body rows
    bottom: [char; 4],
    vertical: char,
}

const FANCY_GRID: Borders = Borders {
    top: ['╒', '═', '╤', '╕'],
    header: ['╞', '═', '╪', '╡'],
    middle: ['├', '─', '┼', '┤'],
    bottom: ['╘', '═', '╧', '╛'],
    vertical: '│',
};

const DOUBLE: Borders = Borders {
    top: ['╔', '═', '╦', '╗'],
    header: ['╠', '═', '╬', '╣'],
    middle: ['╠', '═', '╬', '╣'],
    bottom: ['╚', '═', '╩', '╝'],
    vertical: '║',
};

// Terminal table with a header row
//
// Example:
//   ╒══════════╤════════╕
//   │ Field    │ Value  │
//   ╞══════════╪════════╡
//   │ Username │ natgeo │
//   ╘══════════╧════════╛
pub fn fancy_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    render(&FANCY_GRID, Some(&header), rows)
}

// Report table without a header, double-line borders
pub fn boxed(rows: &[Vec<String>]) -> String {
    render(&DOUBLE, None, rows)
}

fn render(borders: &Borders, header: Option<&Vec<String>>, rows: &[Vec<String>]) -> String {
    let widths = column_widths(header.into_iter().chain(rows.iter()));
    let mut lines = Vec::with_capacity(rows.len() * 2 + 4);

    lines.push(rule(&borders.top, &widths));
    if let Some(header) = header {
        lines.push(row(borders.vertical, header, &widths));
        lines.push(rule(&borders.header, &widths));
    }
    for (i, cells) in rows.iter().enumerate() {
        lines.push(row(borders.vertical, cells, &widths));
        if i + 1 < rows.len() {
            lines.push(rule(&borders.middle, &widths));
        }
    }
    lines.push(rule(&borders.bottom, &widths));

    lines.join("\n")
}

fn column_widths<'a>(rows: impl Iterator<Item = &'a Vec<String>>) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for cells in rows {
        for (i, cell) in cells.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths
}

fn rule(chars: &[char; 4], widths: &[usize]) -> String {
    let [left, fill, join, right] = *chars;
    let segments: Vec<String> = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .collect();
    format!("{left}{}{right}", segments.join(&join.to_string()))
}

fn row(vertical: char, cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = w - cell.chars().count();
            format!(" {cell}{} ", " ".repeat(pad))
        })
        .collect();
    format!("{vertical}{}{vertical}", padded.join(&vertical.to_string()))
}
