//! Table grid reconstruction from page text.
//!
//! The text layer carries no ruling lines, so rows are rebuilt line by
//! line. A line is split into cells on tabs, pipes or runs of two or more
//! spaces; inside each piece, trailing amount tokens are peeled off into
//! cells of their own. Text pieces ahead of the first amount of a data row
//! form one label, however widely the renderer spaced them. Lines that end
//! up as a single text cell are not rows, but the most recent one becomes
//! the label of a following row whose first cell is an amount (labels
//! printed above their figures).

use crate::gst::rules::patterns::{AMOUNT_CELL, CELL_SEPARATOR, SECTION_HEADING};
use crate::pdf::PdfPage;

/// One reconstructed table row; the first cell is the label.
pub type GridRow = Vec<String>;

/// Whether a token looks like a table amount.
pub fn is_amount(token: &str) -> bool {
    AMOUNT_CELL.is_match(token)
}

/// Number of a section heading starting the line (`"4"`, `"3.1"`), if any.
pub fn section_number(line: &str) -> Option<&str> {
    SECTION_HEADING
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split one line of page text into cells.
pub fn split_cells(line: &str) -> Vec<String> {
    CELL_SEPARATOR
        .split(line.trim())
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .flat_map(peel_amounts)
        .collect()
}

/// Split trailing amounts off a piece of text.
///
/// Only peels when at least one trailing token has a decimal point, so
/// labels ending in a bare number ("rules 38,42 & 43") stay intact.
fn peel_amounts(piece: &str) -> Vec<String> {
    let tokens: Vec<&str> = piece.split_whitespace().collect();
    let trailing = tokens.iter().rev().take_while(|t| is_amount(t)).count();

    let has_decimal = tokens[tokens.len() - trailing..]
        .iter()
        .any(|t| t.contains('.'));
    if trailing == 0 || !has_decimal {
        return vec![piece.to_string()];
    }

    let split = tokens.len() - trailing;
    let mut cells = Vec::with_capacity(trailing + 1);
    if split > 0 {
        cells.push(tokens[..split].join(" "));
    }
    cells.extend(tokens[split..].iter().map(|t| t.to_string()));
    cells
}

/// Join the text cells ahead of the first amount into a single label.
///
/// Lines without any amount (column headers) are left as they are.
fn join_label(mut cells: Vec<String>) -> Vec<String> {
    let first_amount = cells.iter().position(|cell| is_amount(cell));
    match first_amount {
        Some(first_amount) if first_amount > 1 => {
            let label = cells.drain(..first_amount).collect::<Vec<_>>().join(" ");
            cells.insert(0, label);
            cells
        }
        _ => cells,
    }
}

/// Turns consecutive lines into grid rows.
#[derive(Debug, Default)]
pub struct RowBuilder {
    last_text: Option<String>,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line; returns a row when the line carries figures.
    pub fn push_line(&mut self, line: &str) -> Option<GridRow> {
        let mut cells = join_label(split_cells(line));
        match cells.len() {
            0 => None,
            1 => {
                self.last_text = cells.pop();
                None
            }
            _ => {
                if is_amount(&cells[0]) {
                    if let Some(label) = self.last_text.take() {
                        cells.insert(0, label);
                    }
                }
                self.last_text = None;
                Some(cells)
            }
        }
    }
}

/// The first table of a section on one page.
///
/// Looks for the first line containing `section_anchor`, then the first line
/// at or after it containing `header_anchor`. The header line becomes row 0;
/// data rows follow until the next numbered section heading or the end of
/// the page. Returns `None` when either anchor is missing.
pub fn table_under_header(
    page_text: &str,
    section_anchor: &str,
    header_anchor: &str,
) -> Option<Vec<GridRow>> {
    let lines: Vec<&str> = page_text.lines().collect();
    let section_idx = lines.iter().position(|l| l.contains(section_anchor))?;
    let header_idx = section_idx
        + lines[section_idx..]
            .iter()
            .position(|l| l.contains(header_anchor))?;

    let mut rows = vec![split_cells(lines[header_idx])];
    let mut builder = RowBuilder::new();

    for line in &lines[header_idx + 1..] {
        if section_number(line).is_some() {
            break;
        }
        if let Some(row) = builder.push_line(line) {
            rows.push(row);
        }
    }

    Some(rows)
}

/// Rows between a start line and an end line, across pages.
///
/// Scanning starts after the first line for which `is_start` holds and stops
/// at the first later line for which `is_end` holds. Pages are visited in
/// order; a table may continue onto following pages.
pub fn scoped_rows<S, E>(pages: &[PdfPage], is_start: S, is_end: E) -> Vec<GridRow>
where
    S: Fn(&str) -> bool,
    E: Fn(&str) -> bool,
{
    let mut rows = Vec::new();
    let mut started = false;
    let mut builder = RowBuilder::new();

    for page in pages {
        for line in page.text.lines() {
            if !started {
                started = is_start(line);
                continue;
            }
            if is_end(line) {
                return rows;
            }
            if let Some(row) = builder.push_line(line) {
                rows.push(row);
            }
        }
    }

    rows
}
