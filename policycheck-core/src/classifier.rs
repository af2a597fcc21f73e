use crate::config::{FieldPattern, OperatorPattern, PolicyConfig};
use crate::types::*;

/// Decides whether a sentence states a checkable rule and, if so, reduces it
/// to a `StructuredRule`.
///
/// All matching is lowercase substring search against the configured tables.
/// Field and operator are resolved in independent passes; each pass takes the
/// first table entry found, so a sentence never resolves to two fields.
pub struct SentenceClassifier {
    keywords: Vec<String>,
    field_patterns: Vec<FieldPattern>,
    operator_patterns: Vec<OperatorPattern>,
    comparand_patterns: Vec<FieldPattern>,
}

impl Default for SentenceClassifier {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

impl SentenceClassifier {
    pub fn new(config: &PolicyConfig) -> Self {
        let lower_fields = |patterns: &[FieldPattern]| -> Vec<FieldPattern> {
            patterns
                .iter()
                .map(|p| FieldPattern::new(&p.phrase.to_lowercase(), p.field))
                .collect()
        };

        Self {
            keywords: config
                .rule_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            field_patterns: lower_fields(&config.field_patterns),
            operator_patterns: config
                .operator_patterns
                .iter()
                .map(|p| OperatorPattern::new(&p.phrase.to_lowercase(), p.operator))
                .collect(),
            comparand_patterns: lower_fields(&config.comparand_patterns),
        }
    }

    pub fn classify(&self, sentence: &str, spans: &[EntitySpan]) -> Option<StructuredRule> {
        let lower = sentence.to_lowercase();
        if !self.is_rule_candidate(&lower) {
            return None;
        }

        let conditions = spans
            .iter()
            .filter(|span| span.is_span_start)
            .map(|span| span.text.clone())
            .collect();

        let field = self.resolve_field(&lower);
        let operator = self.resolve_operator(&lower);
        let comparand = match (field, operator) {
            (Some(field), Some(ComparisonOperator::Equals)) => {
                self.resolve_comparand(&lower, field)
            }
            _ => None,
        };

        Some(StructuredRule::new(sentence, conditions, field, operator).with_comparand(comparand))
    }

    fn is_rule_candidate(&self, lower: &str) -> bool {
        self.keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
    }

    fn resolve_field(&self, lower: &str) -> Option<RuleField> {
        self.field_patterns
            .iter()
            .find(|p| lower.contains(p.phrase.as_str()))
            .map(|p| p.field)
    }

    fn resolve_operator(&self, lower: &str) -> Option<ComparisonOperator> {
        self.operator_patterns
            .iter()
            .find(|p| lower.contains(p.phrase.as_str()))
            .map(|p| p.operator)
    }

    /// Second column named in the sentence, other than the rule's own field
    fn resolve_comparand(&self, lower: &str, field: RuleField) -> Option<RuleField> {
        self.comparand_patterns
            .iter()
            .filter(|p| p.field != field)
            .find(|p| lower.contains(p.phrase.as_str()))
            .map(|p| p.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(sentence: &str) -> Option<StructuredRule> {
        SentenceClassifier::default().classify(sentence, &[])
    }

    #[test]
    fn sentences_without_keywords_are_not_rules() {
        assert_eq!(classify("The sky is blue today."), None);
        assert_eq!(classify("Account balances are reported monthly."), None);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        for sentence in [
            "Balances MUST be reconciled.",
            "Reviews Should happen weekly.",
            "Overdrafts are Not Allowed.",
            "A manager is Required for approval.",
            "Transfers proceed only if approved.",
        ] {
            assert!(classify(sentence).is_some(), "{sentence}");
        }
    }

    #[test]
    fn negative_balance_rule() {
        let rule = classify("The account balance must not be negative.").unwrap();
        assert_eq!(rule.field(), Some(RuleField::AccountBalance));
        assert_eq!(rule.operator(), Some(ComparisonOperator::LessThan(0.0)));
        assert_eq!(rule.text(), "The account balance must not be negative.");
    }

    #[test]
    fn field_priority_takes_first_match() {
        let rule =
            classify("The risk score and account balance must not be negative.").unwrap();
        assert_eq!(rule.field(), Some(RuleField::AccountBalance));
    }

    #[test]
    fn field_without_operator_is_inert() {
        let rule = classify("The risk score must be reviewed quarterly.").unwrap();
        assert_eq!(rule.field(), Some(RuleField::RiskScore));
        assert_eq!(rule.operator(), None);
        assert!(!rule.is_validatable());
    }

    #[test]
    fn operator_without_field_is_inert() {
        let rule = classify("Customers with a rating greater than 5 require review.").unwrap();
        assert_eq!(rule.field(), None);
        assert_eq!(rule.operator(), Some(ComparisonOperator::GreaterThan(5.0)));
        assert!(!rule.is_validatable());
    }

    #[test]
    fn must_match_resolves_comparand_column() {
        let rule = classify("The reported amount must match the transaction amount.").unwrap();
        assert_eq!(rule.field(), Some(RuleField::TransactionAmount));
        assert_eq!(rule.operator(), Some(ComparisonOperator::Equals));
        assert_eq!(rule.comparand(), Some(RuleField::ReportedAmount));
    }

    #[test]
    fn comparand_only_for_equals() {
        let rule = classify(
            "The transaction amount must not be negative, nor the reported amount.",
        )
        .unwrap();
        assert_eq!(rule.comparand(), None);
    }

    #[test]
    fn conditions_keep_span_starts_in_order() {
        let spans = vec![
            EntitySpan::new("Acme", true),
            EntitySpan::new("Bank", false),
            EntitySpan::new("Florida", true),
        ];
        let rule = SentenceClassifier::default()
            .classify("Acme Bank customers in Florida must keep a positive balance.", &spans)
            .unwrap();
        assert_eq!(rule.conditions(), &["Acme".to_string(), "Florida".to_string()]);
    }

    #[test]
    fn configured_tables_are_lowercased() {
        let config = PolicyConfig {
            rule_keywords: vec!["PROHIBITED".to_string()],
            field_patterns: vec![FieldPattern::new("Risk Score", RuleField::RiskScore)],
            ..PolicyConfig::default()
        };
        let rule = SentenceClassifier::new(&config)
            .classify("A risk score above 9 is prohibited.", &[])
            .unwrap();
        assert_eq!(rule.field(), Some(RuleField::RiskScore));
        assert_eq!(
            SentenceClassifier::new(&config).classify("Balances must be positive.", &[]),
            None
        );
    }
}
