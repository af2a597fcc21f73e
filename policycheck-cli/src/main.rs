use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// Import from policycheck-core
use policycheck::{render_json, render_text, PipelineStages, PolicyConfig, PolicyProcessor};

#[derive(Parser)]
#[command(name = "policycheck")]
#[command(about = "Extract rules from a policy document and check a CSV dataset against them")]
struct Args {
    /// Path to the policy document (PDF or plain text)
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Path to the CSV dataset to validate
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    output_format: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the number of preview characters
    #[arg(long)]
    preview_chars: Option<usize>,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: extracted text, sentences, rules, validation outcome and result lines
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.show_configs {
        show_help();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("❌ Processing failed: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "policycheck=debug,policycheck_core=debug"
    } else {
        "policycheck=info,policycheck_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let policy = args
        .policy
        .as_deref()
        .context("--policy is required (see --show-configs)")?;
    let data = args
        .data
        .as_deref()
        .context("--data is required (see --show-configs)")?;

    let mut config = match &args.config {
        Some(path) => {
            let config = PolicyConfig::load_from_file(path)
                .with_context(|| format!("failed to load config {path}"))?;
            tracing::info!("📋 Loaded config from: {}", path);
            config
        }
        None => {
            tracing::info!("📋 Using default config");
            PolicyConfig::default()
        }
    };

    // Apply CLI overrides to config
    if let Some(chars) = args.preview_chars {
        config.preview_chars = chars;
    }

    let processor = PolicyProcessor::new(config);

    if args.dump_stages {
        tracing::info!("🔬 Pipeline stage dump mode");
        let stages = processor.process_capture_stages(policy, data)?;
        save_stages(&stages, &args.stages_dir, policy, data)?;
        println!("✅ All stages dumped to: {}", args.stages_dir);
        return Ok(());
    }

    let output = processor.process_with_profiling(policy, data, args.profile)?;

    let rendered = match args.output_format.as_str() {
        "json" => {
            let value = render_json(&output, policy, data, chrono::Utc::now());
            serde_json::to_string_pretty(&value)?
        }
        "text" => render_text(&output),
        other => {
            tracing::warn!("⚠️  Unknown output format '{}', using text", other);
            render_text(&output)
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("💾 Report saved to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --policy <path>         Policy document (.pdf, .txt, .md)");
    println!("  --data <path>           CSV dataset to validate");
    println!("  --config <path>         Load custom config file");
    println!("  --output <path>         Write the report to a file instead of stdout");
    println!("  --output-format <fmt>   Output format: text or json");
    println!("  --preview-chars <n>     Characters of extracted text to preview (default 1000)");
    println!("  --profile               Log timings for every pipeline step");
    println!("  --dump-stages           Write every intermediate stage to --stages-dir");
    println!("  --verbose               Debug logging (RUST_LOG overrides)");

    println!("\n📄 Output Formats:");
    println!("  text  - Preview, numbered rules and result lines (default)");
    println!("  json  - Same content plus outcome details and a generated_at timestamp");

    println!("\n📁 Config file keys (all optional):");
    println!("  rule_keywords       Phrases that make a sentence a rule");
    println!("  field_patterns      Phrase → dataset column");
    println!("  operator_patterns   Phrase → comparison (less_than, greater_than, equals)");
    println!("  comparand_patterns  Columns an equals rule can be compared against");
    println!("  preview_chars       Preview length");
    println!("  report              Wording of the result lines");

    println!("\n📝 Usage Examples:");
    println!("  policycheck -p policy.pdf -d accounts.csv");
    println!("  policycheck -p policy.pdf -d accounts.csv -f json -o report.json");
    println!("  policycheck -p policy.txt -d accounts.csv -c rules.yaml --dump-stages");
}

fn save_stages(
    stages: &PipelineStages,
    output_dir: &str,
    policy: &Path,
    data: &Path,
) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Extracted text
    let text_path = format!("{}/stage1_text.txt", output_dir);
    fs::write(&text_path, &stages.text)?;
    println!("  💾 {}", text_path);

    // Stage 2a: Sentences
    let sentences_path = format!("{}/stage2a_sentences.json", output_dir);
    fs::write(&sentences_path, serde_json::to_string_pretty(&stages.sentences)?)?;
    println!("  💾 {} ({} sentences)", sentences_path, stages.sentences.len());

    // Stage 2b: Rules
    let rules_path = format!("{}/stage2b_rules.json", output_dir);
    fs::write(&rules_path, serde_json::to_string_pretty(&stages.rules)?)?;
    println!("  💾 {} ({} rules)", rules_path, stages.rules.len());

    // Stage 3: Validation outcome and result lines
    let outcome_path = format!("{}/stage3_outcome.json", output_dir);
    fs::write(&outcome_path, serde_json::to_string_pretty(&stages.outcome)?)?;
    println!("  💾 {}", outcome_path);

    let results_path = format!("{}/stage3_results.txt", output_dir);
    fs::write(&results_path, stages.results.join("\n"))?;
    println!("  💾 {} ({} lines)", results_path, stages.results.len());

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "policy": policy.display().to_string(),
        "dataset": data.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "text_chars": stages.text.chars().count(),
            "sentences": stages.sentences.len(),
            "rules": stages.rules.len(),
            "dataset_columns": stages.dataset_columns.len(),
            "dataset_rows": stages.dataset_rows,
            "violations": stages.outcome.violations.len(),
            "failures": stages.outcome.failures.len(),
        }
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path);

    Ok(())
}
