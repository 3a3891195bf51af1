/// File ingestion for a generation request
///
/// Word documents are flattened into reference text; images and PDFs are
/// forwarded to the model as base64 inline parts. Anything else is skipped.
use crate::docx::{self, DocxError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DOCX_EXTENSION: &str = ".docx";
pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Could not read text from {file}: {source}")]
    Extraction {
        file: String,
        #[source]
        source: DocxError,
    },
}

/// A user-selected file held in memory with its declared content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its type from the extension.
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = content_type_for_name(&name).to_string();
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Content type a browser would declare for a file name.
pub fn content_type_for_name(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => PDF_MIME_TYPE,
        "docx" => DOCX_MIME_TYPE,
        "txt" => "text/plain",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Binary content forwarded to the model next to the prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAttachment {
    pub mime_type: String,
    /// Standard base64 of the original bytes.
    pub data: String,
}

/// Where a file ends up once a submission is ingested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileRoute {
    /// Text is extracted and appended to the reference material.
    ExtractText,
    /// Sent to the model as a base64 inline part.
    Inline,
    /// Not sent at all.
    Skipped,
}

impl FileRoute {
    pub fn label(&self) -> &'static str {
        match self {
            FileRoute::ExtractText => "text",
            FileRoute::Inline => "inline",
            FileRoute::Skipped => "skipped",
        }
    }
}

/// Word documents route by name, everything else by declared type.
pub fn route_for(file: &SourceFile) -> FileRoute {
    if file.name.ends_with(DOCX_EXTENSION) {
        FileRoute::ExtractText
    } else if file.content_type.starts_with("image/") || file.content_type == PDF_MIME_TYPE {
        FileRoute::Inline
    } else {
        FileRoute::Skipped
    }
}

/// How a single file contributes to the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attachment {
    ExtractedText {
        source_file_name: String,
        text: String,
    },
    InlineBinary(InlineAttachment),
}

impl Attachment {
    /// Route one file. `Ok(None)` means the type is not supported.
    pub fn from_file(file: &SourceFile) -> Result<Option<Self>, IngestError> {
        match route_for(file) {
            FileRoute::ExtractText => {
                let text = docx::extract_raw_text(&file.bytes).map_err(|source| {
                    IngestError::Extraction {
                        file: file.name.clone(),
                        source,
                    }
                })?;
                Ok(Some(Attachment::ExtractedText {
                    source_file_name: file.name.clone(),
                    text,
                }))
            }
            FileRoute::Inline => {
                let data = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
                Ok(Some(Attachment::InlineBinary(InlineAttachment {
                    mime_type: file.content_type.clone(),
                    data,
                })))
            }
            FileRoute::Skipped => Ok(None),
        }
    }
}

/// Files split into reference text and inline parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestedFiles {
    pub extracted_text: String,
    pub inline_parts: Vec<InlineAttachment>,
    pub skipped: Vec<String>,
}

impl IngestedFiles {
    fn push(&mut self, attachment: Attachment) {
        match attachment {
            Attachment::ExtractedText {
                source_file_name,
                text,
            } => {
                self.extracted_text.push_str(&format!(
                    "\n\n--- Content of file {} ---\n{}",
                    source_file_name, text
                ));
            }
            Attachment::InlineBinary(part) => self.inline_parts.push(part),
        }
    }
}

/// Process files one after another in selection order.
pub fn ingest_files(files: &[SourceFile]) -> Result<IngestedFiles, IngestError> {
    let mut ingested = IngestedFiles::default();
    for file in files {
        match Attachment::from_file(file)? {
            Some(attachment) => {
                tracing::debug!(
                    target: "ingest",
                    "Ingested {} ({}, {} bytes)",
                    file.name,
                    file.content_type,
                    file.size()
                );
                ingested.push(attachment);
            }
            None => {
                tracing::debug!(
                    target: "ingest",
                    "Skipping {} with unsupported type {}",
                    file.name,
                    file.content_type
                );
                ingested.skipped.push(file.name.clone());
            }
        }
    }
    Ok(ingested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::tests::docx_with_body;

    #[test]
    fn test_content_type_for_name() {
        assert_eq!(content_type_for_name("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for_name("brief.pdf"), PDF_MIME_TYPE);
        assert_eq!(content_type_for_name("notes.docx"), DOCX_MIME_TYPE);
        assert_eq!(content_type_for_name("Makefile"), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_images_and_pdfs_become_inline_parts() {
        let files = vec![
            SourceFile::new("a.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]),
            SourceFile::new("b.pdf", PDF_MIME_TYPE, b"%PDF-1.7".to_vec()),
        ];
        let ingested = ingest_files(&files).unwrap();
        assert!(ingested.extracted_text.is_empty());
        assert_eq!(
            ingested.inline_parts,
            vec![
                InlineAttachment {
                    mime_type: "image/png".to_string(),
                    data: "iVBORw==".to_string(),
                },
                InlineAttachment {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    data: "JVBERi0xLjc=".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_docx_is_flattened_into_text() {
        let bytes = docx_with_body("<w:p><w:r><w:t>Brand voice: upbeat</w:t></w:r></w:p>");
        let files = vec![SourceFile::new("brief.docx", DOCX_MIME_TYPE, bytes)];
        let ingested = ingest_files(&files).unwrap();
        assert!(ingested.inline_parts.is_empty());
        assert_eq!(
            ingested.extracted_text,
            "\n\n--- Content of file brief.docx ---\nBrand voice: upbeat\n\n"
        );
    }

    #[test]
    fn test_docx_routing_uses_the_name() {
        // Declared type does not matter for Word documents.
        let bytes = docx_with_body("<w:p><w:r><w:t>x</w:t></w:r></w:p>");
        let files = vec![SourceFile::new("brief.docx", FALLBACK_MIME_TYPE, bytes)];
        let ingested = ingest_files(&files).unwrap();
        assert!(ingested.extracted_text.contains("brief.docx"));
    }

    #[test]
    fn test_route_for() {
        let route = |name: &str, content_type: &str| {
            route_for(&SourceFile::new(name, content_type, vec![]))
        };
        assert_eq!(route("brief.docx", FALLBACK_MIME_TYPE), FileRoute::ExtractText);
        assert_eq!(route("frame.png", "image/png"), FileRoute::Inline);
        assert_eq!(route("deck.pdf", PDF_MIME_TYPE), FileRoute::Inline);
        assert_eq!(route("notes.txt", "text/plain"), FileRoute::Skipped);
        assert_eq!(FileRoute::Inline.label(), "inline");
    }

    #[test]
    fn test_unsupported_files_are_skipped() {
        let files = vec![
            SourceFile::new("notes.txt", "text/plain", b"hello".to_vec()),
            SourceFile::new("clip.mp4", "video/mp4", vec![0; 16]),
            SourceFile::new("old.doc", "application/msword", vec![1, 2, 3]),
        ];
        let ingested = ingest_files(&files).unwrap();
        assert!(ingested.extracted_text.is_empty());
        assert!(ingested.inline_parts.is_empty());
        assert_eq!(ingested.skipped, vec!["notes.txt", "clip.mp4", "old.doc"]);
    }

    #[test]
    fn test_broken_docx_fails_the_batch() {
        let files = vec![
            SourceFile::new("a.png", "image/png", vec![1]),
            SourceFile::new("broken.docx", DOCX_MIME_TYPE, b"not a zip".to_vec()),
        ];
        let err = ingest_files(&files).unwrap_err();
        let IngestError::Extraction { file, .. } = err;
        assert_eq!(file, "broken.docx");
    }

    #[tokio::test]
    async fn test_load_declares_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.webp");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let file = SourceFile::load(&path).await.unwrap();
        assert_eq!(file.name, "still.webp");
        assert_eq!(file.content_type, "image/webp");
        assert_eq!(file.bytes, vec![1, 2, 3]);
    }
}
