//! PDF Preprocessor
//!
//! Extracts the text layer of digital PDFs page by page. Scanned PDFs
//! without a text layer yield empty pages, not an error.

use crate::error::InputError;
use crate::preprocessors::preprocessor::{file_extension, Preprocessor};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct PdfPreprocessor;

impl PdfPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for PdfPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, InputError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            InputError::UnreadableDocument {
                path: PathBuf::new(),
                reason: format!("PDF parsing failed: {e}"),
            }
        })?;

        tracing::debug!("📄 Extracted {} PDF pages", pages.len());

        let mut text = String::new();
        for page in pages {
            text.push_str(&page);
            text.push('\n');
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "PdfPreprocessor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        matches!(file_extension(path).as_deref(), Some("pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a one-page PDF with lopdf (the library pdf-extract reads with).
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extracts_text_layer() {
        let bytes = make_test_pdf("Balances must not be negative");
        let text = PdfPreprocessor::new().extract_text(&bytes).unwrap();

        assert!(
            text.contains("Balances") || text.contains("negative"),
            "unexpected extraction: {text}"
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn corrupt_pdf_is_unreadable() {
        let result = PdfPreprocessor::new().extract_text(b"not a pdf");
        assert!(matches!(result, Err(InputError::UnreadableDocument { .. })));
    }

    #[test]
    fn supports_pdf_extension_only() {
        let pre = PdfPreprocessor::new();
        assert!(pre.supports_file_type(Path::new("policy.PDF")));
        assert!(!pre.supports_file_type(Path::new("policy.txt")));
        assert!(!pre.supports_file_type(Path::new("policy")));
    }
}
