use super::recognizer::{CapitalizedPhraseRecognizer, EntityRecognizer};
use super::segmenter::{PunctuationSegmenter, SentenceSegmenter};
use crate::classifier::SentenceClassifier;
use crate::config::PolicyConfig;
use crate::types::{EntitySpan, StructuredRule};
use serde::Serialize;

/// Sentences and rules captured from one extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionStages {
    pub sentences: Vec<String>,
    pub rules: Vec<StructuredRule>,
}

pub struct RuleExtractor {
    segmenter: Box<dyn SentenceSegmenter>,
    recognizer: Box<dyn EntityRecognizer>,
    classifier: SentenceClassifier,
    span_start_prefix: String,
}

impl RuleExtractor {
    /// Create a RuleExtractor with injected collaborators
    pub fn new(
        segmenter: Box<dyn SentenceSegmenter>,
        recognizer: Box<dyn EntityRecognizer>,
        config: &PolicyConfig,
    ) -> Self {
        Self {
            segmenter,
            recognizer,
            classifier: SentenceClassifier::new(config),
            span_start_prefix: config.span_start_prefix.clone(),
        }
    }

    /// Extractor using the built-in segmenter and recognizer
    pub fn with_defaults(config: &PolicyConfig) -> Self {
        Self::new(
            Box::new(PunctuationSegmenter::new()),
            Box::new(CapitalizedPhraseRecognizer::new()),
            config,
        )
    }

    /// Every qualifying sentence becomes one rule, in document order.
    /// Identical sentences are not merged.
    pub fn extract_rules(&self, text: &str) -> Vec<StructuredRule> {
        self.extract_with_stages(text).rules
    }

    pub fn extract_with_stages(&self, text: &str) -> ExtractionStages {
        let sentences = self.segmenter.segment(text);
        tracing::debug!(
            "✂️  {} split text into {} sentences",
            self.segmenter.name(),
            sentences.len()
        );

        let rules: Vec<StructuredRule> = sentences
            .iter()
            .filter_map(|sentence| {
                let spans = self.entity_spans(sentence);
                self.classifier.classify(sentence, &spans)
            })
            .collect();

        tracing::info!(
            "📜 Extracted {} rules from {} sentences",
            rules.len(),
            sentences.len()
        );
        for rule in &rules {
            tracing::debug!(
                "   rule: {:?} field={:?} operator={:?}",
                rule.text(),
                rule.field(),
                rule.operator()
            );
        }

        ExtractionStages { sentences, rules }
    }

    fn entity_spans(&self, sentence: &str) -> Vec<EntitySpan> {
        self.recognizer
            .recognize(sentence)
            .iter()
            .map(|entity| EntitySpan::from_recognized(entity, &self.span_start_prefix))
            .collect()
    }
}
