//! Language detection
//!
//! A statistical script-frequency detector collapsed onto the supported
//! language set. Several Devanagari-script detector outcomes (Hindi,
//! Marathi, Nepali) and Urdu all collapse to Hindi; everything else falls
//! back to English. Detection failure is never an error: the caller gets
//! English with a fixed low confidence and an explicit `Fallback` source.

use serde::{Deserialize, Serialize};

/// Confidence assigned when detection fails and English is assumed
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Languages the pipeline supports end to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    /// Parse a detector or user-supplied code, collapsing related languages
    /// into the supported set. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            // Marathi, Nepali and Urdu collapse to Hindi
            "hi" | "mr" | "ne" | "ur" => Some(Language::Hi),
            _ => None,
        }
    }

    /// All supported languages
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Hi]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// How a detection result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Caller supplied a language hint; detection skipped
    Hint,
    /// Script statistics produced a classification
    Detector,
    /// Detection failed or was unsupported; default language assumed
    Fallback,
}

/// Language detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub language: Language,
    /// Heuristic confidence in [0, 1]; not a calibrated probability
    pub confidence: f32,
    pub source: DetectionSource,
}

impl LanguageDetection {
    /// Build a detection result from a caller hint
    pub fn from_hint(language: Language) -> Self {
        Self {
            language,
            confidence: 1.0,
            source: DetectionSource::Hint,
        }
    }

    /// Detect language from text by script statistics
    pub fn detect(text: &str) -> Self {
        let mut devanagari = 0u32;
        let mut arabic = 0u32;
        let mut latin = 0u32;
        let mut total = 0u32;

        for c in text.chars() {
            if !c.is_alphabetic() {
                continue;
            }
            total += 1;
            match c {
                '\u{0900}'..='\u{097F}' => devanagari += 1,
                // Urdu is written in Arabic script; it collapses to Hindi
                '\u{0600}'..='\u{06FF}' => arabic += 1,
                'a'..='z' | 'A'..='Z' => latin += 1,
                _ => {}
            }
        }

        if total == 0 {
            return Self {
                language: Language::En,
                confidence: FALLBACK_CONFIDENCE,
                source: DetectionSource::Fallback,
            };
        }

        let total_f = total as f32;
        let indic = devanagari + arabic;
        if indic > latin && indic > 0 {
            Self {
                language: Language::Hi,
                confidence: indic as f32 / total_f,
                source: DetectionSource::Detector,
            }
        } else if latin > 0 {
            Self {
                language: Language::En,
                confidence: latin as f32 / total_f,
                source: DetectionSource::Detector,
            }
        } else {
            // Script not in the supported set (CJK, Cyrillic, ...): fall back
            Self {
                language: Language::En,
                confidence: FALLBACK_CONFIDENCE,
                source: DetectionSource::Fallback,
            }
        }
    }
}
