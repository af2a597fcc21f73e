use crate::error::ConfigError;
use crate::types::{ComparisonOperator, RuleField};
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_rule_keywords() -> Vec<String> {
    [
        "must",
        "should",
        "shall",
        "not allowed",
        "cannot",
        "only if",
        "required",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_field_patterns() -> Vec<FieldPattern> {
    vec![
        FieldPattern::new("account balance", RuleField::AccountBalance),
        FieldPattern::new("risk score", RuleField::RiskScore),
        FieldPattern::new("transaction amount", RuleField::TransactionAmount),
    ]
}

fn default_operator_patterns() -> Vec<OperatorPattern> {
    vec![
        OperatorPattern::new("not be negative", ComparisonOperator::LessThan(0.0)),
        OperatorPattern::new("greater than 5", ComparisonOperator::GreaterThan(5.0)),
        OperatorPattern::new("must match", ComparisonOperator::Equals),
    ]
}

fn default_comparand_patterns() -> Vec<FieldPattern> {
    let mut patterns = default_field_patterns();
    patterns.push(FieldPattern::new("reported amount", RuleField::ReportedAmount));
    patterns
}

fn default_span_start_prefix() -> String {
    "B-".to_string()
}

fn default_preview_chars() -> usize {
    1000
}

fn default_no_violations_message() -> String {
    "✅ No violations found!".to_string()
}

fn default_violation_prefix() -> String {
    "❌ Violation:".to_string()
}

fn default_failure_prefix() -> String {
    "⚠️ Rule could not be checked:".to_string()
}

fn default_unvalidatable_prefix() -> String {
    "ℹ️ Extracted but unvalidatable:".to_string()
}

/// Lowercase phrase that, when found in a sentence, names a dataset column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPattern {
    pub phrase: String,
    pub field: RuleField,
}

impl FieldPattern {
    pub fn new(phrase: &str, field: RuleField) -> Self {
        Self {
            phrase: phrase.to_string(),
            field,
        }
    }
}

/// Lowercase phrase that, when found in a sentence, selects a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorPattern {
    pub phrase: String,
    pub operator: ComparisonOperator,
}

impl OperatorPattern {
    pub fn new(phrase: &str, operator: ComparisonOperator) -> Self {
        Self {
            phrase: phrase.to_string(),
            operator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// The single line emitted when no rule is violated
    #[serde(default = "default_no_violations_message")]
    pub no_violations_message: String,
    #[serde(default = "default_violation_prefix")]
    pub violation_prefix: String,
    #[serde(default = "default_failure_prefix")]
    pub failure_prefix: String,
    #[serde(default = "default_unvalidatable_prefix")]
    pub unvalidatable_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            no_violations_message: default_no_violations_message(),
            violation_prefix: default_violation_prefix(),
            failure_prefix: default_failure_prefix(),
            unvalidatable_prefix: default_unvalidatable_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// A sentence is a candidate rule iff its lowercase form contains one of these
    #[serde(default = "default_rule_keywords")]
    pub rule_keywords: Vec<String>,
    /// Checked in order; the first phrase found decides the rule's field
    #[serde(default = "default_field_patterns")]
    pub field_patterns: Vec<FieldPattern>,
    /// Checked in order; the first phrase found decides the rule's operator
    #[serde(default = "default_operator_patterns")]
    pub operator_patterns: Vec<OperatorPattern>,
    /// Columns an `Equals` rule may be compared against, in priority order
    #[serde(default = "default_comparand_patterns")]
    pub comparand_patterns: Vec<FieldPattern>,
    /// Entity label prefix marking the first token of an entity
    #[serde(default = "default_span_start_prefix")]
    pub span_start_prefix: String,
    /// Number of characters of extracted text shown as a preview
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rule_keywords: default_rule_keywords(),
            field_patterns: default_field_patterns(),
            operator_patterns: default_operator_patterns(),
            comparand_patterns: default_comparand_patterns(),
            span_start_prefix: default_span_start_prefix(),
            preview_chars: default_preview_chars(),
            report: ReportConfig::default(),
        }
    }
}

impl PolicyConfig {
    /// Load config from a YAML file. Keys left out take their defaults.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PolicyConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!("⚠️  Failed to load config from {}, using defaults: {}", p, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rule_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "rule_keywords must contain at least one keyword".to_string(),
            ));
        }
        if self.span_start_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "span_start_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_builtin_tables() {
        let config = PolicyConfig::default();
        assert_eq!(config.rule_keywords.len(), 7);
        assert_eq!(config.field_patterns[0].field, RuleField::AccountBalance);
        assert_eq!(
            config.operator_patterns[2].operator,
            ComparisonOperator::Equals
        );
        assert_eq!(config.comparand_patterns.len(), 4);
        assert_eq!(config.preview_chars, 1000);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let yaml = r#"
preview_chars: 200
operator_patterns:
  - phrase: "at most 10"
    operator: { kind: greater_than, value: 10 }
"#;
        let config = PolicyConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.preview_chars, 200);
        assert_eq!(
            config.operator_patterns,
            vec![OperatorPattern::new(
                "at most 10",
                ComparisonOperator::GreaterThan(10.0)
            )]
        );
        assert_eq!(config.rule_keywords, default_rule_keywords());
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let result = PolicyConfig::from_yaml_str("rule_keywords: []\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = PolicyConfig::load_with_fallback(Some("/nonexistent/policy.yaml"));
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn load_from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "span_start_prefix: \"U-\"\n").unwrap();

        let config = PolicyConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.span_start_prefix, "U-");
    }
}
