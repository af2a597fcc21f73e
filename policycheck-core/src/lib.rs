// Policycheck Core Library
//
// Extracts checkable rules from policy documents and validates tabular
// datasets against them. Main interface is `PolicyProcessor`.

pub mod types;
pub mod error;
pub mod config;
pub mod preprocessors;
pub mod dataset;
pub mod classifier;
pub mod extraction;
pub mod rules;
pub mod report;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{ConfigError, InputError, PredicateError};
pub use config::{FieldPattern, OperatorPattern, PolicyConfig, ReportConfig};
pub use preprocessors::{PdfPreprocessor, PlainTextPreprocessor, Preprocessor};
pub use dataset::{CellValue, CsvLoader, Dataset, TableLoader};
pub use classifier::SentenceClassifier;
pub use extraction::{
    CapitalizedPhraseRecognizer, EntityRecognizer, PunctuationSegmenter, RuleExtractor,
    SentenceSegmenter,
};
pub use rules::{validate, RuleValidator};
pub use report::{assemble, render_rows, rule_lines, ReportAssembler};
pub use processor::{text_preview, PipelineStages, PolicyProcessor, StepProfiler};
