//! CV ingestion: accepts uploaded files, extracts plain text, and normalizes
//! it for prompting. PDF extraction goes through `pdf-extract`, DOCX through
//! `docx-rs`; plain-text formats are decoded as UTF-8 with a lossy fallback.
//! Anything else is rejected with a user-visible error, never silently
//! skipped.

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Formats the uploader accepts, by file extension.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "text", "md"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file format '.{0}' (allowed: pdf, docx, txt, text, md)")]
    UnsupportedFormat(String),

    #[error("file has no extension (allowed: pdf, docx, txt, text, md)")]
    MissingExtension,

    #[error("file exceeds the {limit_mb} MB size limit")]
    TooLarge { limit_mb: u64 },

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("failed to extract text from DOCX: {0}")]
    Docx(String),

    #[error("no text could be extracted from the file")]
    Empty,
}

/// A CV in session scope: created on upload, discarded with the session.
#[derive(Debug, Clone)]
pub struct CvDocument {
    pub id: Uuid,
    pub filename: String,
    /// Extracted, preprocessed plain text.
    pub text: String,
}

/// Validates, extracts, and preprocesses one uploaded document.
pub fn ingest_document(
    filename: &str,
    bytes: &[u8],
    max_file_size_mb: u64,
) -> Result<CvDocument, IngestError> {
    if bytes.len() as u64 > max_file_size_mb * 1024 * 1024 {
        return Err(IngestError::TooLarge {
            limit_mb: max_file_size_mb,
        });
    }

    let raw = extract_text(filename, bytes)?;
    let text = preprocess_text(&raw);
    if text.is_empty() {
        return Err(IngestError::Empty);
    }

    debug!(
        "ingested '{}': {} bytes -> {} chars of text",
        filename,
        bytes.len(),
        text.chars().count()
    );

    Ok(CvDocument {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        text,
    })
}

/// Extracts plain text from a file based on its extension.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, IngestError> {
    match extension(filename) {
        Some(ext) if ext == "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| IngestError::Pdf(e.to_string())),
        Some(ext) if ext == "docx" => extract_text_from_docx(bytes),
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        Some(ext) => Err(IngestError::UnsupportedFormat(ext)),
        None => Err(IngestError::MissingExtension),
    }
}

/// Extracts the text of every paragraph in the document body, including
/// paragraphs inside table cells.
fn extract_text_from_docx(bytes: &[u8]) -> Result<String, IngestError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| IngestError::Docx(e.to_string()))?;
    let mut text = String::new();
    for child in docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(p) => push_paragraph_text(&p, &mut text),
            docx_rs::DocumentChild::Table(table) => {
                for row in table.rows {
                    let docx_rs::TableChild::TableRow(row) = row;
                    for cell in row.cells {
                        let docx_rs::TableRowChild::TableCell(cell) = cell;
                        for content in cell.children {
                            if let docx_rs::TableCellContent::Paragraph(p) = content {
                                push_paragraph_text(&p, &mut text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph_text(paragraph: &docx_rs::Paragraph, out: &mut String) {
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    out.push_str(&t.text);
                }
            }
        }
    }
    out.push('\n');
}

fn extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Collapses whitespace runs to single spaces and drops control characters.
/// Prompt templates receive one continuous line of text per document.
pub fn preprocess_text(text: &str) -> String {
    let printable: String = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}
