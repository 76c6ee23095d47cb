//! Word-processor document access.

mod docx;

pub use docx::DocxDocument;
#[cfg(test)]
pub(crate) use docx::build_docx;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, crate::error::DocumentError>;

/// A table: ordered rows of ordered cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A table cell. Cells may contain nested tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<String>,
    pub tables: Vec<Table>,
}

impl TableCell {
    /// Cell text: its paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// Read access to the text structure of a document.
pub trait DocumentSource {
    /// Top-level paragraph texts in document order.
    fn paragraphs(&self) -> &[String];

    /// Top-level tables in document order.
    fn tables(&self) -> &[Table];
}
