use crate::error::InputError;
use crate::preprocessors::preprocessor::{file_extension, Preprocessor};
use std::path::{Path, PathBuf};

/// Reads UTF-8 text and markdown policy documents as-is
#[derive(Debug, Default)]
pub struct PlainTextPreprocessor;

impl PlainTextPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for PlainTextPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, InputError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| InputError::UnreadableDocument {
            path: PathBuf::new(),
            reason: format!("not valid UTF-8: {e}"),
        })
    }

    fn name(&self) -> &str {
        "PlainTextPreprocessor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        matches!(
            file_extension(path).as_deref(),
            Some("txt") | Some("text") | Some("md")
        )
    }
}
