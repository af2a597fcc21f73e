use crate::types::RecognizedEntity;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Words (with inner apostrophes, hyphens, ampersands) and numeric amounts
    static ref TOKEN_PATTERN: Regex =
        Regex::new(r"[A-Za-z][A-Za-z'&-]*|[$€£]?\d[\d,]*(?:\.\d+)?%?").unwrap();
}

/// Function words that start with a capital only because of position
const STOP_WORDS: &[&str] = &[
    "A", "An", "All", "Any", "Each", "Every", "If", "In", "No", "The", "This", "These", "Those",
    "When", "Where", "Unless", "Only", "I",
];

/// Tags the entities in one sentence, token by token.
///
/// Labels follow the BIO convention: `B-<TYPE>` marks the first token of an
/// entity, `I-<TYPE>` the tokens that continue it.
pub trait EntityRecognizer {
    fn recognize(&self, sentence: &str) -> Vec<RecognizedEntity>;

    /// Recognizer name for logging
    fn name(&self) -> &str;
}

/// Heuristic recognizer: runs of capitalized words become `MISC` entities and
/// numeric amounts become single-token `NUM` entities.
///
/// The sentence-initial word only counts when the next word is capitalized
/// too, so "Acme Bank must ..." yields `Acme Bank` while "Customers must ..."
/// yields nothing.
#[derive(Debug, Default)]
pub struct CapitalizedPhraseRecognizer;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Capitalized,
    Number,
    Other,
}

fn token_kind(token: &str) -> TokenKind {
    let Some(first) = token.chars().next() else {
        return TokenKind::Other;
    };
    if first.is_ascii_digit() || matches!(first, '$' | '€' | '£') {
        TokenKind::Number
    } else if first.is_uppercase() && !STOP_WORDS.contains(&token) {
        TokenKind::Capitalized
    } else {
        TokenKind::Other
    }
}

impl CapitalizedPhraseRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityRecognizer for CapitalizedPhraseRecognizer {
    fn recognize(&self, sentence: &str) -> Vec<RecognizedEntity> {
        let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(sentence).map(|m| m.as_str()).collect();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| token_kind(t)).collect();

        let mut entities = Vec::new();
        let mut in_phrase = false;

        for (i, (token, kind)) in tokens.iter().zip(&kinds).enumerate() {
            match kind {
                TokenKind::Number => {
                    in_phrase = false;
                    entities.push(RecognizedEntity {
                        word: token.to_string(),
                        entity: "B-NUM".to_string(),
                    });
                }
                TokenKind::Capitalized => {
                    let starts_sentence = i == 0;
                    let continues_into_name = kinds.get(1) == Some(&TokenKind::Capitalized);
                    if starts_sentence && !continues_into_name {
                        continue;
                    }
                    let label = if in_phrase { "I-MISC" } else { "B-MISC" };
                    entities.push(RecognizedEntity {
                        word: token.to_string(),
                        entity: label.to_string(),
                    });
                    in_phrase = true;
                }
                TokenKind::Other => in_phrase = false,
            }
        }

        entities
    }

    fn name(&self) -> &str {
        "CapitalizedPhraseRecognizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(sentence: &str) -> Vec<(String, String)> {
        CapitalizedPhraseRecognizer::new()
            .recognize(sentence)
            .into_iter()
            .map(|e| (e.word, e.entity))
            .collect()
    }

    fn pair(word: &str, entity: &str) -> (String, String) {
        (word.to_string(), entity.to_string())
    }

    #[test]
    fn multi_word_names_get_begin_then_inside() {
        assert_eq!(
            labels("Customers of First National Bank must file in Miami."),
            vec![
                pair("First", "B-MISC"),
                pair("National", "I-MISC"),
                pair("Bank", "I-MISC"),
                pair("Miami", "B-MISC"),
            ]
        );
    }

    #[test]
    fn sentence_initial_word_needs_a_capitalized_follower() {
        assert!(labels("Customers must keep a positive balance.").is_empty());
        assert_eq!(
            labels("Acme Bank must report daily."),
            vec![pair("Acme", "B-MISC"), pair("Bank", "I-MISC")]
        );
    }

    #[test]
    fn numbers_are_single_token_entities() {
        assert_eq!(
            labels("Transfers above $10,000 or 2.5% need review by Compliance."),
            vec![
                pair("$10,000", "B-NUM"),
                pair("2.5%", "B-NUM"),
                pair("Compliance", "B-MISC"),
            ]
        );
    }

    #[test]
    fn stop_words_do_not_start_entities() {
        assert!(labels("If the risk score is high, The team must act.").is_empty());
    }
}
