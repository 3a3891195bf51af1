/// Raw text extraction for Word (.docx) documents
///
/// A .docx file is a zip container; the body lives in `word/document.xml`.
/// Only text runs, tabs and line breaks are kept, with paragraphs separated
/// by a blank line.
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("document body 'word/document.xml' is missing")]
    MissingDocument,
    #[error("failed to read document body: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Extract the plain text of a .docx document held in memory.
pub fn extract_raw_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Err(DocxError::MissingDocument),
        Err(err) => return Err(err.into()),
    }
    document_xml_to_text(&xml)
}

fn document_xml_to_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:t" {
                    in_run_text = true;
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape()?);
            }
            Event::CData(t) if in_run_text => {
                text.push_str(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}
