use crate::types::RuleField;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal input errors. Any of these aborts a run before rule extraction starts.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read policy document {path}: {reason}")]
    UnreadableDocument { path: PathBuf, reason: String },

    #[error("unsupported policy document type: {path}")]
    UnsupportedDocument { path: PathBuf },

    #[error("failed to read dataset: {0}")]
    UnreadableDataset(String),

    #[error("dataset has no header row")]
    EmptyDataset,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rule whose predicate could not be applied to the dataset.
///
/// Scoped to a single rule: the validator records it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredicateError {
    #[error("missing column {column}")]
    MissingColumn { column: String },

    #[error("non-numeric value {value:?} in column {column} at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("no column to compare {field} against")]
    MissingComparand { field: RuleField },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
