//! Document Preprocessors
//!
//! This module turns an uploaded policy document into plain text for rule
//! extraction.
//!
//! ## Architecture
//!
//! ```text
//! Document (PDF, TXT, MD)
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! Plain text (pages joined with newlines)
//!     ↓
//! [Rule Extractor]
//! ```
//!
//! ## Available Preprocessors
//!
//! - `PdfPreprocessor` - PDF documents via `pdf-extract`
//! - `PlainTextPreprocessor` - UTF-8 text and markdown files

pub mod preprocessor;
pub mod pdf;
pub mod plain;

// Re-export main types
pub use preprocessor::{select_preprocessor, Preprocessor};
pub use pdf::PdfPreprocessor;
pub use plain::PlainTextPreprocessor;
