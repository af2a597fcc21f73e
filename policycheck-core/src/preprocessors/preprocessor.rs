// Preprocessor abstraction for policy documents
//
// This module defines the boundary between document reading (bytes -> text)
// and rule extraction (text -> rules). Everything after this point works on
// plain text and is format-agnostic.

use crate::error::InputError;
use std::path::Path;

/// Preprocessor trait - converts documents to plain text
///
/// Preprocessors handle format parsing and text extraction only. Multi-page
/// formats concatenate their pages, each followed by a newline.
pub trait Preprocessor {
    /// Convert document bytes to text
    fn extract_text(&self, bytes: &[u8]) -> Result<String, InputError>;

    /// Reads the file and extracts its text
    fn process_file(&self, input: &Path) -> Result<String, InputError> {
        let bytes = std::fs::read(input)?;
        self.extract_text(&bytes).map_err(|e| match e {
            InputError::UnreadableDocument { reason, .. } => InputError::UnreadableDocument {
                path: input.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}

/// Lowercased file extension, if any
pub(crate) fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// First preprocessor that accepts `path`
pub fn select_preprocessor<'a>(
    preprocessors: &'a [Box<dyn Preprocessor>],
    path: &Path,
) -> Result<&'a dyn Preprocessor, InputError> {
    preprocessors
        .iter()
        .find(|p| p.supports_file_type(path))
        .map(|p| p.as_ref())
        .ok_or_else(|| InputError::UnsupportedDocument {
            path: path.to_path_buf(),
        })
}
