use crate::dataset::{CellValue, Dataset, NumericCell};
use crate::error::PredicateError;
use crate::types::{ComparisonOperator, RuleField, StructuredRule};

/// Row test produced by compiling a predicate against a dataset's header.
/// Takes the 1-based data row number (for error messages) and the row cells;
/// `Ok(true)` means the row violates the rule.
pub type RowPredicate = Box<dyn Fn(usize, &[CellValue]) -> Result<bool, PredicateError>>;

/// Field + operator pair of a validatable rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulePredicate {
    field: RuleField,
    operator: ComparisonOperator,
    comparand: Option<RuleField>,
}

impl RulePredicate {
    /// `None` for inert rules (no field or no operator)
    pub fn from_rule(rule: &StructuredRule) -> Option<Self> {
        Some(Self {
            field: rule.field()?,
            operator: rule.operator()?,
            comparand: rule.comparand(),
        })
    }

    pub fn field(&self) -> RuleField {
        self.field
    }

    /// `"<field> <operator>"`, with the comparand column appended for `==`
    pub fn expression(&self) -> String {
        match (self.operator, self.comparand) {
            (ComparisonOperator::Equals, Some(other)) => {
                format!("{} {} {}", self.field, self.operator, other)
            }
            _ => format!("{} {}", self.field, self.operator),
        }
    }

    /// Resolve column positions once and build the per-row test.
    ///
    /// Fails when a referenced column is absent, or when an `Equals` rule has
    /// no comparand column.
    pub fn compile(&self, dataset: &Dataset) -> Result<RowPredicate, PredicateError> {
        let column = self.field.column_name();
        let index = column_index(dataset, column)?;

        match self.operator {
            ComparisonOperator::LessThan(limit) => Ok(Box::new(move |row_no, row| {
                Ok(numeric(row, index, column, row_no)?.is_some_and(|v| v < limit))
            })),
            ComparisonOperator::GreaterThan(limit) => Ok(Box::new(move |row_no, row| {
                Ok(numeric(row, index, column, row_no)?.is_some_and(|v| v > limit))
            })),
            ComparisonOperator::Equals => {
                let other = self
                    .comparand
                    .ok_or(PredicateError::MissingComparand { field: self.field })?;
                let other_column = other.column_name();
                let other_index = column_index(dataset, other_column)?;

                Ok(Box::new(move |row_no, row| {
                    let left = numeric(row, index, column, row_no)?;
                    let right = numeric(row, other_index, other_column, row_no)?;
                    Ok(matches!((left, right), (Some(a), Some(b)) if a != b))
                }))
            }
        }
    }
}

fn column_index(dataset: &Dataset, column: &str) -> Result<usize, PredicateError> {
    dataset
        .column_index(column)
        .ok_or_else(|| PredicateError::MissingColumn {
            column: column.to_string(),
        })
}

/// Missing cells come back as `None` and never satisfy a comparison
fn numeric(
    row: &[CellValue],
    index: usize,
    column: &str,
    row_no: usize,
) -> Result<Option<f64>, PredicateError> {
    let Some(cell) = row.get(index) else {
        return Ok(None);
    };
    match cell.as_number() {
        NumericCell::Number(v) => Ok(Some(v)),
        NumericCell::Missing => Ok(None),
        NumericCell::Invalid => Err(PredicateError::NonNumeric {
            column: column.to_string(),
            row: row_no,
            value: cell.display_text(),
        }),
    }
}
