use super::{CellValue, Dataset, DEFAULT_NA_VALUES};
use crate::error::InputError;
use std::path::Path;

/// Loads a delimited-text export into a `Dataset`
pub trait TableLoader {
    fn load(&self, bytes: &[u8]) -> Result<Dataset, InputError>;

    /// Reads the file and loads its bytes
    fn load_file(&self, path: &Path) -> Result<Dataset, InputError> {
        let bytes = std::fs::read(path)?;
        self.load(&bytes)
    }

    /// Loader name for logging
    fn name(&self) -> &str;
}

/// CSV loader backed by the `csv` crate. The first record is the header.
///
/// Records shorter than the header are padded with empty cells; longer
/// records make the table unreadable. Fields spelled like one of
/// `na_values` load as empty cells.
pub struct CsvLoader {
    delimiter: u8,
    na_values: Vec<String>,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            na_values: DEFAULT_NA_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::new()
        }
    }

    /// Replace the missing-value spellings
    pub fn with_na_values<S: AsRef<str>>(mut self, na_values: &[S]) -> Self {
        self.na_values = na_values.iter().map(|v| v.as_ref().to_string()).collect();
        self
    }

    fn parse_cell(&self, raw: &str) -> CellValue {
        CellValue::parse_with_na(raw, |value| self.na_values.iter().any(|na| na == value))
    }
}

impl TableLoader for CsvLoader {
    fn load(&self, bytes: &[u8]) -> Result<Dataset, InputError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| InputError::UnreadableDataset(e.to_string()))?;
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(InputError::EmptyDataset);
        }

        let mut dataset = Dataset::new(headers.iter().map(str::to_string).collect())?;
        let width = dataset.columns().len();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| InputError::UnreadableDataset(e.to_string()))?;
            if record.len() > width {
                return Err(InputError::UnreadableDataset(format!(
                    "record {} has {} fields, header has {}",
                    index + 1,
                    record.len(),
                    width
                )));
            }

            let mut row: Vec<CellValue> = record.iter().map(|raw| self.parse_cell(raw)).collect();
            row.resize(width, CellValue::Empty);
            dataset.push_row(row)?;
        }

        tracing::debug!(
            "📊 Loaded dataset: {} columns, {} rows",
            dataset.columns().len(),
            dataset.len()
        );
        Ok(dataset)
    }

    fn name(&self) -> &str {
        "CsvLoader"
    }
}
