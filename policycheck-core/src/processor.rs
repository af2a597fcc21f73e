use crate::config::PolicyConfig;
use crate::dataset::{CsvLoader, Dataset, TableLoader};
use crate::extraction::{
    CapitalizedPhraseRecognizer, EntityRecognizer, PunctuationSegmenter, RuleExtractor,
    SentenceSegmenter,
};
use crate::preprocessors::{
    select_preprocessor, PdfPreprocessor, PlainTextPreprocessor, Preprocessor,
};
use crate::report::ReportAssembler;
use crate::rules::RuleValidator;
use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used by `--dump-stages` to inspect each boundary of a run
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub text: String,
    pub sentences: Vec<String>,
    pub rules: Vec<StructuredRule>,
    pub dataset_columns: Vec<String>,
    pub dataset_rows: usize,
    pub outcome: ValidationOutcome,
    pub results: Vec<String>,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        tracing::info!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        tracing::info!("📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            tracing::info!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        tracing::info!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// First `max_chars` characters of the extracted text
pub fn text_preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub struct PolicyProcessor {
    preprocessors: Vec<Box<dyn Preprocessor>>,
    loader: Box<dyn TableLoader>,
    extractor: RuleExtractor,
    validator: RuleValidator,
    assembler: ReportAssembler,
    config: PolicyConfig,
}

impl PolicyProcessor {
    /// Create PolicyProcessor with full dependency injection
    pub fn new_with_dependencies(
        preprocessors: Vec<Box<dyn Preprocessor>>,
        loader: Box<dyn TableLoader>,
        segmenter: Box<dyn SentenceSegmenter>,
        recognizer: Box<dyn EntityRecognizer>,
        config: PolicyConfig,
    ) -> Self {
        Self {
            preprocessors,
            loader,
            extractor: RuleExtractor::new(segmenter, recognizer, &config),
            validator: RuleValidator::new(),
            assembler: ReportAssembler::new(&config.report),
            config,
        }
    }

    /// Processor with the built-in PDF/text readers, CSV loader, segmenter and recognizer
    pub fn new(config: PolicyConfig) -> Self {
        Self::new_with_dependencies(
            vec![
                Box::new(PdfPreprocessor::new()),
                Box::new(PlainTextPreprocessor::new()),
            ],
            Box::new(CsvLoader::new()),
            Box::new(PunctuationSegmenter::new()),
            Box::new(CapitalizedPhraseRecognizer::new()),
            config,
        )
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn extractor(&self) -> &RuleExtractor {
        &self.extractor
    }

    /// Policy document + dataset → preview, rules and result lines
    pub fn process(&self, policy_path: &Path, dataset_path: &Path) -> Result<PipelineOutput> {
        self.process_with_profiling(policy_path, dataset_path, false)
    }

    pub fn process_with_profiling(
        &self,
        policy_path: &Path,
        dataset_path: &Path,
        enable_profiling: bool,
    ) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        let (text, dataset) = self.load_inputs(policy_path, dataset_path, &mut profiler)?;
        let output = self.process_loaded(&text, &dataset, &mut profiler);

        profiler.print_summary();
        tracing::info!(
            "⏱️  Total processing time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(output)
    }

    /// Run extraction, validation and reporting over already-loaded inputs
    pub fn process_text(&self, text: &str, dataset: &Dataset) -> PipelineOutput {
        self.process_loaded(text, dataset, &mut StepProfiler::new(false))
    }

    /// Same as `process`, keeping every intermediate artifact
    pub fn process_capture_stages(
        &self,
        policy_path: &Path,
        dataset_path: &Path,
    ) -> Result<PipelineStages> {
        let mut profiler = StepProfiler::new(false);
        let (text, dataset) = self.load_inputs(policy_path, dataset_path, &mut profiler)?;

        let extraction = self.extractor.extract_with_stages(&text);
        tracing::info!("📋 Stage 1: {} characters of text", text.len());
        tracing::info!(
            "📋 Stage 2: {} sentences, {} rules",
            extraction.sentences.len(),
            extraction.rules.len()
        );

        let outcome = self.validator.validate(&extraction.rules, &dataset);
        let results = self.assembler.assemble_report(&outcome);
        tracing::info!("📋 Stage 3: {} result lines", results.len());

        Ok(PipelineStages {
            text,
            sentences: extraction.sentences,
            rules: extraction.rules,
            dataset_columns: dataset.columns().to_vec(),
            dataset_rows: dataset.len(),
            outcome,
            results,
        })
    }

    /// Both inputs are read before any extraction so that a bad file aborts
    /// the run up front
    fn load_inputs(
        &self,
        policy_path: &Path,
        dataset_path: &Path,
        profiler: &mut StepProfiler,
    ) -> Result<(String, Dataset)> {
        tracing::info!("📄 Processing policy: {}", policy_path.display());

        let preprocessor = select_preprocessor(&self.preprocessors, policy_path)?;
        let text = profiler
            .time_step("Text extraction", || preprocessor.process_file(policy_path))
            .with_context(|| {
                format!(
                    "{} could not read {}",
                    preprocessor.name(),
                    policy_path.display()
                )
            })?;

        let dataset = profiler
            .time_step("Dataset load", || self.loader.load_file(dataset_path))
            .with_context(|| format!("failed to load dataset {}", dataset_path.display()))?;
        tracing::info!(
            "📊 Loaded {} rows x {} columns with {}",
            dataset.len(),
            dataset.columns().len(),
            self.loader.name()
        );

        Ok((text, dataset))
    }

    fn process_loaded(
        &self,
        text: &str,
        dataset: &Dataset,
        profiler: &mut StepProfiler,
    ) -> PipelineOutput {
        let preview = text_preview(text, self.config.preview_chars);
        let rules = profiler.time_step("Rule extraction", || self.extractor.extract_rules(text));
        let outcome = profiler.time_step("Validation", || self.validator.validate(&rules, dataset));
        let results = profiler.time_step("Report", || self.assembler.assemble_report(&outcome));

        PipelineOutput {
            preview,
            rules,
            results,
            outcome,
        }
    }
}

impl Default for PolicyProcessor {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}
