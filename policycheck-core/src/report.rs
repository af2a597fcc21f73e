use crate::config::ReportConfig;
use crate::types::*;
use serde_json::Value;

/// Turns validation results into the ordered lines shown to the user
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    config: ReportConfig,
}

impl ReportAssembler {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// One line per violation record, or the single "no violations" line
    pub fn assemble(&self, violations: &[ViolationRecord]) -> Vec<String> {
        if violations.is_empty() {
            return vec![self.config.no_violations_message.clone()];
        }
        violations
            .iter()
            .map(|violation| self.format_violation(violation))
            .collect()
    }

    /// `assemble` lines followed by a notice for every rule that failed to
    /// check, then every rule that could not be validated at all
    pub fn assemble_report(&self, outcome: &ValidationOutcome) -> Vec<String> {
        let mut lines = self.assemble(&outcome.violations);
        lines.extend(outcome.failures.iter().map(|failure| {
            format!(
                "{} {} ({})",
                self.config.failure_prefix, failure.rule_text, failure.error
            )
        }));
        lines.extend(
            outcome
                .unvalidatable
                .iter()
                .map(|text| format!("{} {}", self.config.unvalidatable_prefix, text)),
        );
        lines
    }

    fn format_violation(&self, violation: &ViolationRecord) -> String {
        format!(
            "{} {} - {}",
            self.config.violation_prefix,
            violation.rule_text(),
            render_rows(violation.offending_rows())
        )
    }
}

/// Rows as a compact JSON array of objects
pub fn render_rows(rows: &[RowRecord]) -> String {
    Value::Array(rows.iter().cloned().map(Value::Object).collect()).to_string()
}

/// Numbered display lines for extracted rules, e.g.
/// `1. The account balance must not be negative. (Conditions: [])`
pub fn rule_lines(rules: &[StructuredRule]) -> Vec<String> {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let check = rule
                .predicate_expression()
                .map(|expr| format!(" [check: {expr}]"))
                .unwrap_or_default();
            format!(
                "{}. {} (Conditions: {:?}){}",
                i + 1,
                rule.text(),
                rule.conditions(),
                check
            )
        })
        .collect()
}

/// Assemble with the default report wording
pub fn assemble(violations: &[ViolationRecord]) -> Vec<String> {
    ReportAssembler::default().assemble(violations)
}
