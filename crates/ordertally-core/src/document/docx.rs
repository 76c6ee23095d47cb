//! DOCX reading using zip and quick-xml.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::{debug, trace};

use super::{DocumentSource, Result, Table, TableCell, TableRow};
use crate::error::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const WORDML_STRICT_NS: &[u8] = b"http://purl.oclc.org/ooxml/wordprocessingml/main";

/// Deepest table nesting kept as structure. Deeper tables are read as plain
/// paragraphs of the innermost kept cell.
pub const MAX_TABLE_DEPTH: usize = 32;

/// A DOCX document reduced to its paragraphs and tables.
#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    paragraphs: Vec<String>,
    tables: Vec<Table>,
}

impl DocxDocument {
    /// Open a DOCX document from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

        let mut xml = String::new();
        match archive.by_name(DOCUMENT_PART) {
            Ok(mut part) => {
                part.read_to_string(&mut xml)?;
            }
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(DocumentError::MissingPart(DOCUMENT_PART));
            }
            Err(e) => return Err(e.into()),
        }

        let document = Self::from_xml(&xml)?;
        debug!(
            "Loaded DOCX with {} paragraphs and {} tables",
            document.paragraphs.len(),
            document.tables.len()
        );
        Ok(document)
    }

    /// Parse the main document part (`word/document.xml`).
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut builder = BodyBuilder::default();

        loop {
            let resolved = reader
                .read_resolved_event()
                .map(|(ns, event)| (is_wordml(&ns), event));
            let (wordml, event) = resolved.map_err(|e| {
                DocumentError::Xml(format!("at byte {}: {}", reader.error_position(), e))
            })?;

            match event {
                Event::Start(e) if wordml => builder.open(&e),
                Event::Empty(e) if wordml => {
                    builder.open(&e);
                    builder.close(e.local_name().as_ref());
                }
                Event::End(e) if wordml => builder.close(e.local_name().as_ref()),
                Event::Text(t) => {
                    if builder.capturing_text() {
                        let text = t
                            .unescape()
                            .map_err(|e| DocumentError::Xml(e.to_string()))?;
                        builder.push_text(&text);
                    }
                }
                Event::CData(t) => {
                    if builder.capturing_text() {
                        builder.push_text(&String::from_utf8_lossy(&t));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(builder.finish())
    }
}

/// Whether an element belongs to WordprocessingML. An undeclared `w:` prefix
/// is accepted as well.
fn is_wordml(ns: &ResolveResult<'_>) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == WORDML_NS || *uri == WORDML_STRICT_NS,
        ResolveResult::Unknown(prefix) => prefix.as_slice() == b"w",
        ResolveResult::Unbound => false,
    }
}

impl DocumentSource for DocxDocument {
    fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    fn tables(&self) -> &[Table] {
        &self.tables
    }
}

enum Frame {
    Table(Table),
    Row(TableRow),
    Cell(TableCell),
}

/// Streaming builder that tracks table nesting and the open paragraph.
#[derive(Default)]
struct BodyBuilder {
    paragraphs: Vec<String>,
    tables: Vec<Table>,
    frames: Vec<Frame>,
    paragraph: Option<String>,
    run_depth: usize,
    in_text: bool,
    // Open `w:tbl` elements, including ones past MAX_TABLE_DEPTH.
    table_depth: usize,
    // Text boxes carry their own paragraphs; they are not part of the flow.
    skip_depth: usize,
}

impl BodyBuilder {
    fn capturing_text(&self) -> bool {
        self.in_text && self.skip_depth == 0 && self.paragraph.is_some()
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }

    fn flattening_tables(&self) -> bool {
        self.table_depth > MAX_TABLE_DEPTH
    }

    /// Called with WordprocessingML elements only.
    fn open(&mut self, element: &BytesStart<'_>) {
        let name = element.local_name();
        let name = name.as_ref();

        if name == b"txbxContent" {
            self.skip_depth += 1;
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        match name {
            b"tbl" => {
                self.table_depth += 1;
                if self.flattening_tables() {
                    trace!("Flattening table at depth {}", self.table_depth);
                } else {
                    self.frames.push(Frame::Table(Table::default()));
                }
            }
            b"tr" if !self.flattening_tables() => self.frames.push(Frame::Row(TableRow::default())),
            b"tc" if !self.flattening_tables() => self.frames.push(Frame::Cell(TableCell::default())),
            b"p" => self.paragraph = Some(String::new()),
            b"r" => self.run_depth += 1,
            b"t" => self.in_text = true,
            b"tab" if self.run_depth > 0 => self.push_text("\t"),
            b"br" | b"cr" if self.run_depth > 0 => self.push_text("\n"),
            _ => {}
        }
    }

    /// Called with the local name of WordprocessingML elements only.
    fn close(&mut self, name: &[u8]) {
        if name == b"txbxContent" {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        if self.flattening_tables() && matches!(name, b"tbl" | b"tr" | b"tc") {
            if name == b"tbl" {
                self.table_depth -= 1;
            }
            return;
        }

        match name {
            b"t" => self.in_text = false,
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"p" => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.attach_paragraph(paragraph);
                }
            }
            b"tc" => {
                if let Some(Frame::Cell(cell)) = self.pop_if(|f| matches!(f, Frame::Cell(_))) {
                    if let Some(Frame::Row(row)) = self.frames.last_mut() {
                        row.cells.push(cell);
                    }
                }
            }
            b"tr" => {
                if let Some(Frame::Row(row)) = self.pop_if(|f| matches!(f, Frame::Row(_))) {
                    if let Some(Frame::Table(table)) = self.frames.last_mut() {
                        table.rows.push(row);
                    }
                }
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if let Some(Frame::Table(table)) = self.pop_if(|f| matches!(f, Frame::Table(_))) {
                    match self.frames.last_mut() {
                        Some(Frame::Cell(cell)) => cell.tables.push(table),
                        None => self.tables.push(table),
                        Some(_) => trace!("Dropping table outside of a cell"),
                    }
                }
            }
            _ => {}
        }
    }

    fn pop_if(&mut self, predicate: impl Fn(&Frame) -> bool) -> Option<Frame> {
        match self.frames.last() {
            Some(frame) if predicate(frame) => self.frames.pop(),
            _ => None,
        }
    }

    fn attach_paragraph(&mut self, paragraph: String) {
        match self.frames.last_mut() {
            Some(Frame::Cell(cell)) => cell.paragraphs.push(paragraph),
            None => self.paragraphs.push(paragraph),
            Some(_) => trace!("Dropping paragraph outside of a cell"),
        }
    }

    fn finish(self) -> DocxDocument {
        DocxDocument {
            paragraphs: self.paragraphs,
            tables: self.tables,
        }
    }
}

/// Build a minimal DOCX archive around a `w:body` fragment.
#[cfg(test)]
pub(crate) fn build_docx(body: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(DOCUMENT_PART, options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
