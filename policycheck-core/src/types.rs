use crate::error::PredicateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dataset row rendered as column name → value, in dataset column order.
pub type RowRecord = serde_json::Map<String, serde_json::Value>;

// ===== RULE TYPES =====
// A StructuredRule is produced once per qualifying sentence and never
// changes afterwards. Field and operator are resolved independently, so
// either may be absent; such a rule is inert and skipped by validation.

/// Dataset columns a rule can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleField {
    #[serde(rename = "Account_Balance")]
    AccountBalance,
    #[serde(rename = "RiskScore")]
    RiskScore,
    #[serde(rename = "Transaction_Amount")]
    TransactionAmount,
    #[serde(rename = "Reported_Amount")]
    ReportedAmount,
}

impl RuleField {
    /// Every known column. All of them hold numeric data.
    pub const ALL: [RuleField; 4] = [
        RuleField::AccountBalance,
        RuleField::RiskScore,
        RuleField::TransactionAmount,
        RuleField::ReportedAmount,
    ];

    /// Column name as it appears in the dataset header
    pub fn column_name(&self) -> &'static str {
        match self {
            RuleField::AccountBalance => "Account_Balance",
            RuleField::RiskScore => "RiskScore",
            RuleField::TransactionAmount => "Transaction_Amount",
            RuleField::ReportedAmount => "Reported_Amount",
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Comparison a rule applies to its field. Rows satisfying the comparison
/// are the violating rows.
///
/// `Equals` carries no literal: it compares the field against a second
/// column (the rule's comparand) and selects rows where the two differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ComparisonOperator {
    LessThan(f64),
    GreaterThan(f64),
    Equals,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::LessThan(n) => write!(f, "< {n}"),
            ComparisonOperator::GreaterThan(n) => write!(f, "> {n}"),
            ComparisonOperator::Equals => f.write_str("=="),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredRule {
    text: String,
    conditions: Vec<String>,
    field: Option<RuleField>,
    operator: Option<ComparisonOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparand: Option<RuleField>,
}

impl StructuredRule {
    pub fn new(
        text: impl Into<String>,
        conditions: Vec<String>,
        field: Option<RuleField>,
        operator: Option<ComparisonOperator>,
    ) -> Self {
        Self {
            text: text.into(),
            conditions,
            field,
            operator,
            comparand: None,
        }
    }

    /// Attach the second column an `Equals` rule is compared against
    pub fn with_comparand(mut self, comparand: Option<RuleField>) -> Self {
        self.comparand = comparand;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn field(&self) -> Option<RuleField> {
        self.field
    }

    pub fn operator(&self) -> Option<ComparisonOperator> {
        self.operator
    }

    pub fn comparand(&self) -> Option<RuleField> {
        self.comparand
    }

    /// A rule without both a field and an operator cannot be checked
    pub fn is_validatable(&self) -> bool {
        self.field.is_some() && self.operator.is_some()
    }

    /// The `"<field> <operator>"` expression shown to users, if the rule has one
    pub fn predicate_expression(&self) -> Option<String> {
        match (self.field, self.operator) {
            (Some(field), Some(operator)) => Some(format!("{field} {operator}")),
            _ => None,
        }
    }
}

// ===== ENTITY TYPES =====

/// One token reported by an entity recognizer, e.g. `{word: "Acme", entity: "B-ORG"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub word: String,
    pub entity: String,
}

/// The part of a recognized entity the classifier cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub is_span_start: bool,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, is_span_start: bool) -> Self {
        Self {
            text: text.into(),
            is_span_start,
        }
    }

    /// Span-start tokens are the ones whose label carries `span_start_prefix`
    pub fn from_recognized(entity: &RecognizedEntity, span_start_prefix: &str) -> Self {
        Self {
            text: entity.word.clone(),
            is_span_start: entity.entity.starts_with(span_start_prefix),
        }
    }
}

// ===== VALIDATION RESULT TYPES =====

/// Rows that fail one rule. Never constructed with zero rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationRecord {
    rule_text: String,
    offending_rows: Vec<RowRecord>,
}

impl ViolationRecord {
    /// Returns `None` when `offending_rows` is empty
    pub fn new(rule_text: impl Into<String>, offending_rows: Vec<RowRecord>) -> Option<Self> {
        if offending_rows.is_empty() {
            return None;
        }
        Some(Self {
            rule_text: rule_text.into(),
            offending_rows,
        })
    }

    pub fn rule_text(&self) -> &str {
        &self.rule_text
    }

    pub fn offending_rows(&self) -> &[RowRecord] {
        &self.offending_rows
    }
}

/// A rule whose predicate could not be applied to the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFailure {
    pub rule_text: String,
    pub error: PredicateError,
}

/// Everything validation learned about a rule sequence, in rule order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub violations: Vec<ViolationRecord>,
    pub failures: Vec<RuleFailure>,
    /// Texts of rules lacking a field or operator
    pub unvalidatable: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

// ===== PIPELINE OUTPUT =====

/// The three artifacts handed to the presentation layer, plus the raw outcome
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub preview: String,
    pub rules: Vec<StructuredRule>,
    pub results: Vec<String>,
    pub outcome: ValidationOutcome,
}
