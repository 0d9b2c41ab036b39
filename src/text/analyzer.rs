//! Text analysis
//!
//! Produces everything downstream stages need from raw input: cleaned text,
//! a language classification, naive sentence/word segmentation, emotion and
//! gesture cue streams, and an advisory duration estimate. Never fails for
//! malformed input; an empty input yields an explicitly empty result.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cleaner::clean_text;
use super::cues::{scan_emotion_cues, scan_gesture_cues, TextCue};
use super::language::{Language, LanguageDetection};

/// Sentence-terminal punctuation
const SENTENCE_ENDINGS: &[char] = &['.', '!', '?'];

/// Words-per-minute speaking rates used for the advisory duration estimate
const WPM_EN: f32 = 150.0;
const WPM_HI: f32 = 120.0;

/// Pause added per sentence in the duration estimate, in seconds
const SENTENCE_PAUSE_SECS: f32 = 0.5;

/// Advisory pre-synthesis timing estimate
///
/// Derived from word count and a per-language speaking rate. The real
/// duration always comes from the synthesized audio; this exists only for
/// progress display and scheduling hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingEstimate {
    pub word_count: usize,
    pub sentence_count: usize,
    pub estimated_secs: f32,
}

/// Full analysis result for one input text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedText {
    pub original_text: String,
    pub cleaned_text: String,
    pub language: LanguageDetection,
    pub sentences: Vec<String>,
    pub words: Vec<String>,
    pub emotion_cues: Vec<TextCue>,
    pub gesture_cues: Vec<TextCue>,
    pub timing: TimingEstimate,
}

impl ProcessedText {
    /// True when the input reduced to nothing after cleaning
    pub fn is_empty(&self) -> bool {
        self.cleaned_text.is_empty()
    }
}

/// Text analyzer
///
/// Segmentation is intentionally naive: sentences split on terminal
/// punctuation runs with no abbreviation handling, words are alphanumeric
/// runs. That approximation is adequate for cue anchoring and timing
/// estimates, not for NLP.
#[derive(Debug, Default, Clone)]
pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze raw text, optionally skipping detection via a language hint
    pub fn analyze(&self, raw_text: &str, language_hint: Option<Language>) -> ProcessedText {
        let cleaned_text = clean_text(raw_text);

        let language = match language_hint {
            Some(lang) => LanguageDetection::from_hint(lang),
            None => LanguageDetection::detect(&cleaned_text),
        };

        let sentences = segment_sentences(&cleaned_text);
        let words = extract_words(&cleaned_text);
        let emotion_cues = scan_emotion_cues(&cleaned_text, language.language);
        let gesture_cues = scan_gesture_cues(&cleaned_text, language.language);
        let timing = estimate_timing(&words, &sentences, language.language);

        debug!(
            language = %language.language,
            sentences = sentences.len(),
            words = words.len(),
            emotion_cues = emotion_cues.len(),
            gesture_cues = gesture_cues.len(),
            "text analyzed"
        );

        ProcessedText {
            original_text: raw_text.to_string(),
            cleaned_text,
            language,
            sentences,
            words,
            emotion_cues,
            gesture_cues,
            timing,
        }
    }
}

/// Split on sentence-terminal punctuation runs, trimming and dropping empties
fn segment_sentences(text: &str) -> Vec<String> {
    text.split(|c| SENTENCE_ENDINGS.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Extract words as maximal alphanumeric runs
fn extract_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn estimate_timing(words: &[String], sentences: &[String], language: Language) -> TimingEstimate {
    let wpm = match language {
        Language::En => WPM_EN,
        Language::Hi => WPM_HI,
    };
    let speech_secs = words.len() as f32 / wpm * 60.0;
    let pause_secs = sentences.len() as f32 * SENTENCE_PAUSE_SECS;
    TimingEstimate {
        word_count: words.len(),
        sentence_count: sentences.len(),
        estimated_secs: speech_secs + pause_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::cues::{CueSubtype, GestureKind};
    use crate::text::language::DetectionSource;

    #[test]
    fn test_analyze_basic() {
        let analyzer = TextAnalyzer::new();
        let result = analyzer.analyze("Hello world. This is a test!", None);
        assert_eq!(result.sentences.len(), 2);
        assert_eq!(result.language.language, Language::En);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_input_is_explicitly_empty() {
        let analyzer = TextAnalyzer::new();
        let result = analyzer.analyze("   ", None);
        assert!(result.is_empty());
        assert!(result.sentences.is_empty());
        assert!(result.words.is_empty());
        assert!(result.emotion_cues.is_empty());
        assert!(result.gesture_cues.is_empty());
        assert_eq!(result.timing.estimated_secs, 0.0);
    }

    #[test]
    fn test_hint_skips_detection() {
        let analyzer = TextAnalyzer::new();
        let result = analyzer.analyze("Hello", Some(Language::Hi));
        assert_eq!(result.language.language, Language::Hi);
        assert_eq!(result.language.source, DetectionSource::Hint);
    }

    #[test]
    fn test_sentence_segmentation() {
        assert_eq!(
            segment_sentences("One. Two! Three? "),
            vec!["One", "Two", "Three"]
        );
        assert!(segment_sentences("...!!??").is_empty());
    }

    #[test]
    fn test_word_extraction() {
        assert_eq!(
            extract_words("Don't stop, 42 times"),
            vec!["Don", "t", "stop", "42", "times"]
        );
    }

    #[test]
    fn test_timing_estimate_grows_with_words() {
        let analyzer = TextAnalyzer::new();
        let short = analyzer.analyze("One two three.", None);
        let long = analyzer.analyze("One two three four five six seven eight nine ten.", None);
        assert!(short.timing.estimated_secs > 0.0);
        assert!(long.timing.estimated_secs > short.timing.estimated_secs);
    }

    #[test]
    fn test_scenario_cues() {
        let analyzer = TextAnalyzer::new();
        let result = analyzer.analyze("Hello! Look at this important example.", Some(Language::En));
        let has = |kind: GestureKind| {
            result
                .gesture_cues
                .iter()
                .any(|c| c.subtype == CueSubtype::Gesture(kind))
        };
        assert!(has(GestureKind::Greeting));
        assert!(has(GestureKind::Pointing));
        assert!(has(GestureKind::Emphasis));
    }
}
