//! Flattening a document into one cleaned string.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::{DocumentSource, Table, TableCell};

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[ \t]+").unwrap();
}

/// Join paragraph and table-cell text in encounter order.
///
/// Paragraphs come first, then every table row-major with nested tables
/// visited depth-first right after their cell. Blank pieces are skipped.
pub fn flatten<D: DocumentSource + ?Sized>(source: &D) -> String {
    let mut pieces: Vec<String> = source
        .paragraphs()
        .iter()
        .filter(|p| !p.trim().is_empty())
        .cloned()
        .collect();

    for table in source.tables() {
        collect_table(table, &mut pieces);
    }

    pieces.join("\n")
}

fn cells(table: &Table) -> impl Iterator<Item = &TableCell> {
    table.rows.iter().flat_map(|row| row.cells.iter())
}

// Walks with an explicit stack so nesting depth never grows the call stack.
fn collect_table(table: &Table, pieces: &mut Vec<String>) {
    let mut stack = vec![cells(table)];

    while let Some(top) = stack.last_mut() {
        let Some(cell) = top.next() else {
            stack.pop();
            continue;
        };

        let text = cell.text();
        if !text.trim().is_empty() {
            pieces.push(text);
        }
        for nested in cell.tables.iter().rev() {
            stack.push(cells(nested));
        }
    }
}

/// Clean flattened text while preserving line structure.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n");

    let cleaned: String = unified
        .chars()
        .filter_map(|c| match c {
            '\r' | '\u{000b}' | '\u{000c}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => Some('\n'),
            '\u{00a0}' | '\u{2007}' | '\u{202f}' => Some(' '),
            '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}' | '\u{feff}' => None,
            '\n' | '\t' => Some(c),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    HORIZONTAL_WS.replace_all(cleaned.trim(), " ").into_owned()
}

/// Flatten and normalize a document.
pub fn normalize_document<D: DocumentSource + ?Sized>(source: &D) -> String {
    normalize(&flatten(source))
}
