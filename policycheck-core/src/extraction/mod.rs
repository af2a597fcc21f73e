//! Rule extraction: document text → ordered `StructuredRule`s.
//!
//! Sentence segmentation and entity recognition are collaborators behind
//! traits; the `RuleExtractor` owns one of each and drives the
//! `SentenceClassifier` over every sentence.

pub mod pipeline;
pub mod recognizer;
pub mod segmenter;

pub use pipeline::{ExtractionStages, RuleExtractor};
pub use recognizer::{CapitalizedPhraseRecognizer, EntityRecognizer};
pub use segmenter::{PunctuationSegmenter, SentenceSegmenter};
