use super::predicate::RulePredicate;
use crate::dataset::Dataset;
use crate::error::PredicateError;
use crate::types::*;

/// Applies each rule's predicate to a dataset and collects the violating rows.
///
/// The evaluator is generic: every rule goes through `RulePredicate`, with
/// no branch keyed on particular rule phrases or columns. A rule whose
/// predicate cannot be applied is recorded as a failure and the remaining
/// rules still run.
#[derive(Debug, Default)]
pub struct RuleValidator;

impl RuleValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, rules: &[StructuredRule], dataset: &Dataset) -> ValidationOutcome {
        tracing::info!(
            "🔍 Validating {} rules against {} rows",
            rules.len(),
            dataset.len()
        );

        let mut outcome = ValidationOutcome::default();

        for rule in rules {
            let Some(predicate) = RulePredicate::from_rule(rule) else {
                tracing::debug!("   ⏭️  Skipping unvalidatable rule: {:?}", rule.text());
                outcome.unvalidatable.push(rule.text().to_string());
                continue;
            };

            match self.offending_rows(&predicate, dataset) {
                Ok(rows) => {
                    tracing::debug!(
                        "   {} → {} offending rows",
                        predicate.expression(),
                        rows.len()
                    );
                    if let Some(record) = ViolationRecord::new(rule.text(), rows) {
                        outcome.violations.push(record);
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        "⚠️  Rule could not be checked ({}): {:?}: {}",
                        predicate.expression(),
                        rule.text(),
                        error
                    );
                    outcome.failures.push(RuleFailure {
                        rule_text: rule.text().to_string(),
                        error,
                    });
                }
            }
        }

        self.log_outcome(&outcome);
        outcome
    }

    /// Rows satisfying the predicate, in dataset order. One bad cell fails
    /// the whole rule.
    fn offending_rows(
        &self,
        predicate: &RulePredicate,
        dataset: &Dataset,
    ) -> Result<Vec<RowRecord>, PredicateError> {
        let test = predicate.compile(dataset)?;

        let mut matched = Vec::new();
        for (index, row) in dataset.rows().iter().enumerate() {
            if test(index + 1, row.as_slice())? {
                matched.push(index);
            }
        }

        Ok(matched
            .into_iter()
            .filter_map(|index| dataset.row_record(index))
            .collect())
    }

    fn log_outcome(&self, outcome: &ValidationOutcome) {
        tracing::info!(
            "📊 Validation: {} violations, {} rules not checked, {} unvalidatable",
            outcome.violations.len(),
            outcome.failures.len(),
            outcome.unvalidatable.len()
        );
    }
}

/// Validate with the default validator
pub fn validate(rules: &[StructuredRule], dataset: &Dataset) -> ValidationOutcome {
    RuleValidator::new().validate(rules, dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn balance_rule() -> StructuredRule {
        StructuredRule::new(
            "The account balance must not be negative.",
            vec![],
            Some(RuleField::AccountBalance),
            Some(ComparisonOperator::LessThan(0.0)),
        )
    }

    fn risk_rule() -> StructuredRule {
        StructuredRule::new(
            "Customers with a risk score greater than 5 require review.",
            vec![],
            Some(RuleField::RiskScore),
            Some(ComparisonOperator::GreaterThan(5.0)),
        )
    }

    fn accounts() -> Dataset {
        Dataset::from_rows(
            &["Customer", "Account_Balance"],
            &[vec!["Ann", "-5"], vec!["Bob", "10"], vec!["Cy", "-1.5"]],
        )
        .unwrap()
    }

    #[test]
    fn empty_rule_list_yields_nothing() {
        let outcome = validate(&[], &accounts());
        assert_eq!(outcome, ValidationOutcome::default());
    }

    #[test]
    fn violating_rows_keep_dataset_order() {
        let outcome = validate(&[balance_rule()], &accounts());

        assert_eq!(outcome.violations.len(), 1);
        let record = &outcome.violations[0];
        assert_eq!(record.rule_text(), "The account balance must not be negative.");
        let rows: Vec<serde_json::Value> = record
            .offending_rows()
            .iter()
            .cloned()
            .map(serde_json::Value::Object)
            .collect();
        assert_eq!(
            rows,
            vec![
                json!({"Customer": "Ann", "Account_Balance": -5}),
                json!({"Customer": "Cy", "Account_Balance": -1.5}),
            ]
        );
    }

    #[test]
    fn passing_rule_emits_no_record() {
        let dataset =
            Dataset::from_rows(&["Account_Balance"], &[vec!["1"], vec!["2"]]).unwrap();
        let outcome = validate(&[balance_rule()], &dataset);
        assert!(outcome.violations.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn missing_column_is_isolated_to_its_rule() {
        let outcome = validate(&[risk_rule(), balance_rule()], &accounts());

        assert_eq!(
            outcome.failures,
            vec![RuleFailure {
                rule_text: risk_rule().text().to_string(),
                error: PredicateError::MissingColumn {
                    column: "RiskScore".to_string()
                },
            }]
        );
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].rule_text(), balance_rule().text());
    }

    #[test]
    fn non_numeric_value_fails_whole_rule() {
        let dataset = Dataset::from_rows(
            &["Account_Balance"],
            &[vec!["-5"], vec!["unknown"]],
        )
        .unwrap();
        let outcome = validate(&[balance_rule()], &dataset);

        assert!(outcome.violations.is_empty());
        assert!(matches!(
            outcome.failures[0].error,
            PredicateError::NonNumeric { row: 2, .. }
        ));
    }

    #[test]
    fn na_cells_are_skipped_not_failed() {
        let dataset = Dataset::from_rows(
            &["Customer", "Account_Balance"],
            &[vec!["Ann", "-5"], vec!["Bob", "NA"], vec!["Cy", "N/A"]],
        )
        .unwrap();
        let outcome = validate(&[balance_rule()], &dataset);

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.violations.len(), 1);
        let rows: Vec<serde_json::Value> = outcome.violations[0]
            .offending_rows()
            .iter()
            .cloned()
            .map(serde_json::Value::Object)
            .collect();
        assert_eq!(rows, vec![json!({"Customer": "Ann", "Account_Balance": -5})]);
    }

    #[test]
    fn inert_rules_are_skipped_not_failed() {
        let inert = StructuredRule::new(
            "Staff should be courteous.",
            vec![],
            None,
            None,
        );
        let outcome = validate(&[inert, balance_rule()], &accounts());

        assert_eq!(outcome.unvalidatable, vec!["Staff should be courteous.".to_string()]);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn records_follow_rule_order() {
        let dataset = Dataset::from_rows(
            &["Account_Balance", "RiskScore"],
            &[vec!["-1", "9"], vec!["4", "2"]],
        )
        .unwrap();
        let outcome = validate(&[risk_rule(), balance_rule()], &dataset);

        let texts: Vec<&str> = outcome.violations.iter().map(|v| v.rule_text()).collect();
        assert_eq!(texts, vec![risk_rule().text(), balance_rule().text()]);
        assert!(outcome
            .violations
            .iter()
            .all(|v| !v.offending_rows().is_empty()));
    }
}
