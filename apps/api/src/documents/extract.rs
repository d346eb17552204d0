//! Plain-text extraction from uploaded resumes (PDF, DOCX, TXT).
//!
//! All functions here block; call them from `spawn_blocking`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Docx,
    Txt,
}

impl FileKind {
    /// Case-insensitive, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "txt" => Some(FileKind::Txt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
            .ok_or_else(|| ExtractError::UnsupportedFormat(extension.to_lowercase()))
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Txt => "txt",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub kind: FileKind,
}

/// Extracts trimmed plain text from the file at `path`, picking the parser from its extension.
pub fn extract_text(path: &Path) -> Result<ExtractedText, ExtractError> {
    let kind = FileKind::from_path(path)?;

    let text = match kind {
        FileKind::Pdf => {
            pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string()))?
        }
        FileKind::Docx => extract_docx(path)?,
        FileKind::Txt => std::fs::read_to_string(path)?,
    };

    Ok(ExtractedText {
        text: text.trim().to_string(),
        kind,
    })
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(File::open(path)?).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("word/document.xml: {e}")))?
        .read_to_string(&mut xml)?;

    document_xml_to_text(&xml)
}

/// Flattens WordprocessingML body text: runs are concatenated, every paragraph
/// ends a line, tabs and breaks are kept.
pub(crate) fn document_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| ExtractError::Docx(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Docx(format!(
                    "malformed document.xml at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(text)
}
