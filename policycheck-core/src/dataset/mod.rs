//! In-memory tables the rules are checked against.
//!
//! A `Dataset` is a header plus rows of typed cells. Cell types are inferred
//! per cell when a table is loaded; rules that compare numerically coerce
//! at validation time and report cells that refuse coercion.

pub mod loader;

pub use loader::{CsvLoader, TableLoader};

use crate::error::InputError;
use crate::types::RowRecord;
use serde::Serialize;
use serde_json::Value;

/// Cell spellings read as missing values, the same set pandas' `read_csv`
/// treats as NaN by default. Matched exactly after trimming.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_default_na(value: &str) -> bool {
    DEFAULT_NA_VALUES.contains(&value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Empty,
}

/// Result of asking a cell for a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Number(f64),
    /// Empty or NaN; never satisfies a comparison
    Missing,
    Invalid,
}

impl CellValue {
    /// Infer the narrowest type for a raw field. Blank fields and the
    /// `DEFAULT_NA_VALUES` spellings become `Empty`.
    pub fn parse(raw: &str) -> Self {
        Self::parse_with_na(raw, |value| is_default_na(value))
    }

    /// Like `parse`, with the caller deciding which trimmed spellings are missing
    pub fn parse_with_na(raw: &str, is_na: impl Fn(&str) -> bool) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || is_na(trimmed) {
            return CellValue::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::Text(raw.to_string())
    }

    pub fn as_number(&self) -> NumericCell {
        match self {
            CellValue::Integer(i) => NumericCell::Number(*i as f64),
            CellValue::Float(f) if f.is_nan() => NumericCell::Missing,
            CellValue::Float(f) => NumericCell::Number(*f),
            CellValue::Text(s) if is_default_na(s.trim()) => NumericCell::Missing,
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_nan() => NumericCell::Missing,
                Ok(f) => NumericCell::Number(f),
                Err(_) => NumericCell::Invalid,
            },
            CellValue::Empty => NumericCell::Missing,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Integer(i) => Value::from(*i),
            // NaN and infinities have no JSON form and become null
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Empty => Value::Null,
        }
    }

    /// Raw text of the cell for error messages
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Result<Self, InputError> {
        if columns.is_empty() {
            return Err(InputError::EmptyDataset);
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a dataset from string cells, inferring cell types
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> Result<Self, InputError> {
        let mut dataset = Self::new(columns.iter().map(|c| c.as_ref().to_string()).collect())?;
        for row in rows {
            dataset.push_row(row.iter().map(|cell| CellValue::parse(cell.as_ref())).collect())?;
        }
        Ok(dataset)
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), InputError> {
        if row.len() != self.columns.len() {
            return Err(InputError::UnreadableDataset(format!(
                "row {} has {} fields, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Row `index` as a column → value mapping in column order
    pub fn row_record(&self, index: usize) -> Option<RowRecord> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().map(CellValue::to_json))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cell_types_are_inferred() {
        assert_eq!(CellValue::parse("-5"), CellValue::Integer(-5));
        assert_eq!(CellValue::parse(" 2.5 "), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("abc"), CellValue::Text("abc".to_string()));
        assert_eq!(CellValue::parse("  "), CellValue::Empty);
    }

    #[test]
    fn na_spellings_are_missing() {
        for token in ["NA", "N/A", "n/a", "null", "None", "#N/A", " NaN "] {
            assert_eq!(CellValue::parse(token), CellValue::Empty, "{token:?}");
        }
        assert_eq!(CellValue::parse("-"), CellValue::Text("-".to_string()));
        assert_eq!(
            CellValue::parse_with_na("-", |v| v == "-"),
            CellValue::Empty
        );
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Integer(3).as_number(), NumericCell::Number(3.0));
        assert_eq!(
            CellValue::Text(" 7.5".to_string()).as_number(),
            NumericCell::Number(7.5)
        );
        assert_eq!(
            CellValue::Text("n/a".to_string()).as_number(),
            NumericCell::Missing
        );
        assert_eq!(
            CellValue::Text("high".to_string()).as_number(),
            NumericCell::Invalid
        );
        assert_eq!(CellValue::Empty.as_number(), NumericCell::Missing);
        assert_eq!(CellValue::Float(f64::NAN).as_number(), NumericCell::Missing);
    }

    #[test]
    fn row_record_preserves_column_order() {
        let dataset = Dataset::from_rows(
            &["Name", "Account_Balance", "Note"],
            &[vec!["Ann", "-5", ""]],
        )
        .unwrap();

        let record = dataset.row_record(0).unwrap();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Name", "Account_Balance", "Note"]);
        assert_eq!(
            serde_json::Value::Object(record),
            json!({"Name": "Ann", "Account_Balance": -5, "Note": null})
        );
        assert!(dataset.row_record(1).is_none());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut dataset = Dataset::new(vec!["a".to_string(), "b".to_string()]).unwrap();
        let err = dataset.push_row(vec![CellValue::Integer(1)]).unwrap_err();
        assert!(matches!(err, InputError::UnreadableDataset(_)));
    }

    #[test]
    fn empty_header_is_rejected() {
        assert!(matches!(
            Dataset::new(Vec::new()),
            Err(InputError::EmptyDataset)
        ));
    }
}
