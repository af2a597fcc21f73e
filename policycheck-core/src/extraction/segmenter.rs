use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A blank line, possibly holding stray spaces
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n[ \t\r]*\n").unwrap();
}

/// Splits document text into sentences, in document order
pub trait SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String>;

    /// Segmenter name for logging
    fn name(&self) -> &str;
}

/// Abbreviations only when a number follows ("No. 4"); otherwise plain words
const NUMBERED_ABBREVIATIONS: &[&str] = &["no", "nos"];

fn default_abbreviations() -> Vec<String> {
    ["e.g", "i.e", "etc", "mr", "mrs", "ms", "dr", "vs", "approx"]
        .iter()
        .map(|a| a.to_string())
        .collect()
}

/// Rule-based segmenter for extracted policy text.
///
/// Blank lines always end a sentence. Inside a paragraph, single line breaks
/// are PDF wrapping and are folded into spaces. A sentence ends at `.`, `!`
/// or `?` (plus any closing quotes or brackets) followed by whitespace or the
/// end of the paragraph, unless the period closes a known abbreviation.
pub struct PunctuationSegmenter {
    abbreviations: Vec<String>,
}

impl Default for PunctuationSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PunctuationSegmenter {
    pub fn new() -> Self {
        Self {
            abbreviations: default_abbreviations(),
        }
    }

    /// Segmenter with extra abbreviations whose trailing period never ends a sentence
    pub fn with_abbreviations<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut segmenter = Self::new();
        segmenter
            .abbreviations
            .extend(extra.iter().map(|a| a.as_ref().trim_end_matches('.').to_lowercase()));
        segmenter
    }

    fn split_paragraph(&self, paragraph: &str, sentences: &mut Vec<String>) {
        let normalized = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut start = 0;
        let mut chars = normalized.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }

            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '”' | '’') {
                    end = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            let (before, after) = (&normalized[start..i], &normalized[end..]);
            if !at_boundary || (c == '.' && self.ends_with_abbreviation(before, after)) {
                continue;
            }

            push_sentence(&normalized[start..end], sentences);
            start = end;
        }

        push_sentence(&normalized[start..], sentences);
    }

    fn ends_with_abbreviation(&self, prefix: &str, rest: &str) -> bool {
        let Some(last) = prefix.split_whitespace().last() else {
            return false;
        };
        let word = last.trim_start_matches(['(', '"', '\'']).to_lowercase();
        if NUMBERED_ABBREVIATIONS.contains(&word.as_str()) {
            return rest.trim_start().starts_with(|c: char| c.is_ascii_digit());
        }
        self.abbreviations.iter().any(|a| *a == word)
    }
}

fn push_sentence(candidate: &str, sentences: &mut Vec<String>) {
    let sentence = candidate.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

impl SentenceSegmenter for PunctuationSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        for paragraph in PARAGRAPH_BREAK.split(text) {
            self.split_paragraph(paragraph, &mut sentences);
        }
        sentences
    }

    fn name(&self) -> &str {
        "PunctuationSegmenter"
    }
}
