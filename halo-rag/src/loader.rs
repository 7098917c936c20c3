//! Text extraction for uploaded files.
//!
//! Tabular formats (CSV, XLSX) yield one document per data row rendered as
//! `"col: value, col: value"`; everything else yields a single document.

use crate::document::{Document, Metadata};
use crate::error::{RagError, Result};
use calamine::{Reader, Xlsx, open_workbook_from_rs};
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Txt,
    Csv,
    Pdf,
    Docx,
    Xlsx,
    Md,
}

impl FileKind {
    pub const ALL: [FileKind; 6] =
        [FileKind::Txt, FileKind::Csv, FileKind::Pdf, FileKind::Docx, FileKind::Xlsx, FileKind::Md];

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Txt => "txt",
            FileKind::Csv => "csv",
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Xlsx => "xlsx",
            FileKind::Md => "md",
        }
    }

    /// Resolve by (case-insensitive) extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension() == ext)
            .ok_or_else(|| {
                RagError::UnsupportedFileType(if ext.is_empty() {
                    filename.to_string()
                } else {
                    format!(".{ext}")
                })
            })
    }

    /// Value stored under the `category` metadata key.
    pub fn category(&self) -> String {
        format!("{} file", self.extension())
    }
}

/// `"return-policy_v2.pdf"` becomes `"Return Policy V2"`.
pub fn derive_title(filename: &str) -> String {
    let stem = Path::new(filename).file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn load_error(filename: &str, message: impl ToString) -> RagError {
    RagError::LoadError { filename: filename.to_string(), message: message.to_string() }
}

/// Extract documents from `bytes`. `base` metadata is copied into each one.
pub fn load_documents(bytes: &[u8], filename: &str, base: &Metadata) -> Result<Vec<Document>> {
    let kind = FileKind::from_filename(filename)?;
    let single = |text: String| -> Vec<Document> {
        if text.trim().is_empty() { Vec::new() } else { vec![Document::new(text, base.clone())] }
    };

    let documents = match kind {
        FileKind::Txt => single(decode_utf8(bytes, filename)?),
        FileKind::Md => single(markdown_to_text(&decode_utf8(bytes, filename)?)),
        FileKind::Pdf => {
            single(pdf_extract::extract_text_from_mem(bytes).map_err(|e| load_error(filename, e))?)
        }
        FileKind::Docx => single(docx_to_text(bytes, filename)?),
        FileKind::Csv => rows_to_documents(csv_rows(bytes, filename)?, base),
        FileKind::Xlsx => rows_to_documents(xlsx_rows(bytes, filename)?, base),
    };
    tracing::debug!(filename, kind = kind.extension(), documents = documents.len(), "loaded file");
    Ok(documents)
}

fn decode_utf8(bytes: &[u8], filename: &str) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| load_error(filename, e))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn markdown_to_text(markdown: &str) -> String {
    use pulldown_cmark::{Event as Md, Parser, TagEnd};

    let mut out = String::new();
    for event in Parser::new(markdown) {
        match event {
            Md::Text(text) | Md::Code(text) => out.push_str(&text),
            Md::SoftBreak | Md::HardBreak => out.push('\n'),
            Md::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock) => {
                out.push('\n')
            }
            _ => {}
        }
    }
    out
}

fn docx_to_text(bytes: &[u8], filename: &str) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| load_error(filename, e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| load_error(filename, e))?
        .read_to_string(&mut xml)?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut out = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event().map_err(|e| load_error(filename, e))? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => out.push('\t'),
            Event::Empty(e) if e.name().as_ref() == b"w:br" => out.push('\n'),
            Event::Text(t) if in_text => {
                out.push_str(&t.unescape().map_err(|e| load_error(filename, e))?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

/// Header row plus data rows, as strings.
type Table = (Vec<String>, Vec<Vec<String>>);

fn csv_rows(bytes: &[u8], filename: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers: Vec<String> =
        reader.headers().map_err(|e| load_error(filename, e))?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| load_error(filename, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

fn xlsx_rows(bytes: &[u8], filename: &str) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| load_error(filename, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| load_error(filename, "workbook has no sheets"))?
        .map_err(|e| load_error(filename, e))?;

    let mut rows = range.rows().map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    Ok((headers, rows.collect()))
}

fn rows_to_documents((headers, rows): Table, base: &Metadata) -> Vec<Document> {
    rows.into_iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|(index, row)| {
            let text = headers
                .iter()
                .enumerate()
                .map(|(i, col)| format!("{col}: {}", row.get(i).map(String::as_str).unwrap_or("")))
                .collect::<Vec<_>>()
                .join(", ");
            let mut metadata = base.clone();
            metadata.insert("row_index".to_string(), index.to_string());
            Document::new(text, metadata)
        })
        .collect()
}
