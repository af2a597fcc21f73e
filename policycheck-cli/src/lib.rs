// All core functionality is in policycheck-core
// This CLI acts as a thin wrapper around the core library

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::path::Path;

// Re-export core types for convenience
pub use policycheck_core::*;

/// Console rendering: preview, numbered rules, then result lines
pub fn render_text(output: &PipelineOutput) -> String {
    let mut out = String::new();

    out.push_str("📄 Extracted text preview:\n");
    out.push_str(&output.preview);
    out.push_str("\n\n📋 Extracted rules:\n");
    if output.rules.is_empty() {
        out.push_str("(none)\n");
    }
    for line in rule_lines(&output.rules) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("\n🔍 Validation results:\n");
    for line in &output.results {
        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Machine-readable report with run metadata
pub fn render_json(
    output: &PipelineOutput,
    policy_path: &Path,
    dataset_path: &Path,
    generated_at: DateTime<Utc>,
) -> Value {
    json!({
        "generated_at": generated_at.to_rfc3339(),
        "policy": policy_path.display().to_string(),
        "dataset": dataset_path.display().to_string(),
        "preview": output.preview,
        "rules": output.rules,
        "results": output.results,
        "outcome": output.outcome,
    })
}
