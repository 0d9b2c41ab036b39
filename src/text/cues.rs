//! Emotion and gesture cue extraction
//!
//! Static per-language trigger tables map words to cue subtypes. The scan
//! is a case-insensitive substring match over the cleaned text; every
//! occurrence of a trigger emits one cue anchored at its character offset.
//! Base duration and intensity are fixed per subtype so cue strength is
//! deterministic and testable.

use serde::{Deserialize, Serialize};

use super::language::Language;

/// Cue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    Emotion,
    Gesture,
}

/// Emotion cue subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionKind {
    Happy,
    Sad,
    Angry,
    Surprised,
    Fear,
    Neutral,
}

/// Gesture cue subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Pointing,
    Emphasis,
    Questioning,
    Explaining,
    Greeting,
    Thinking,
}

/// Cue subtype, emotion or gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueSubtype {
    Emotion(EmotionKind),
    Gesture(GestureKind),
}

impl CueSubtype {
    pub fn kind(&self) -> CueKind {
        match self {
            CueSubtype::Emotion(_) => CueKind::Emotion,
            CueSubtype::Gesture(_) => CueKind::Gesture,
        }
    }
}

/// A text-derived animation or emotion cue
///
/// Cues are stateless facts about the text; `anchor_offset` is a character
/// index into the cleaned text and is only converted to a timestamp by the
/// timeline mapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCue {
    pub subtype: CueSubtype,
    /// Character index into the cleaned text
    pub anchor_offset: usize,
    /// The trigger word that produced this cue
    pub trigger_token: String,
    /// Seconds; fixed per subtype
    pub base_duration: f32,
    /// [0, 1]; fixed per subtype
    pub base_intensity: f32,
}

const EMOTION_TRIGGERS_EN: &[(EmotionKind, &[&str])] = &[
    (EmotionKind::Happy, &["happy", "joy", "excited", "cheerful", "delighted", "pleased"]),
    (EmotionKind::Sad, &["sad", "depressed", "unhappy", "sorrow", "grief", "melancholy"]),
    (EmotionKind::Angry, &["angry", "furious", "mad", "rage", "annoyed", "frustrated"]),
    (EmotionKind::Surprised, &["surprised", "amazed", "shocked", "astonished", "stunned"]),
    (EmotionKind::Fear, &["afraid", "scared", "terrified", "worried", "anxious", "nervous"]),
    (EmotionKind::Neutral, &["said", "stated", "mentioned", "explained", "described"]),
];

const EMOTION_TRIGGERS_HI: &[(EmotionKind, &[&str])] = &[
    (EmotionKind::Happy, &["खुश", "प्रसन्न", "आनंदित", "हर्षित"]),
    (EmotionKind::Sad, &["दुखी", "उदास", "शोकित", "परेशान"]),
    (EmotionKind::Angry, &["गुस्सा", "क्रोधित", "नाराज"]),
    (EmotionKind::Surprised, &["हैरान", "आश्चर्यचकित", "चकित"]),
    (EmotionKind::Fear, &["डर", "भयभीत", "चिंतित"]),
    (EmotionKind::Neutral, &["कहा", "बताया", "समझाया"]),
];

const GESTURE_TRIGGERS_EN: &[(GestureKind, &[&str])] = &[
    (GestureKind::Pointing, &["this", "that", "here", "there", "look", "see"]),
    (GestureKind::Emphasis, &["important", "remember", "listen", "attention", "focus"]),
    (GestureKind::Questioning, &["what", "how", "why", "when", "where", "who"]),
    (GestureKind::Explaining, &["because", "therefore", "so", "thus", "hence"]),
    (GestureKind::Greeting, &["hello", "hi", "welcome", "greetings"]),
    (GestureKind::Thinking, &["think", "consider", "ponder", "reflect", "hmm"]),
];

const GESTURE_TRIGGERS_HI: &[(GestureKind, &[&str])] = &[
    (GestureKind::Pointing, &["यह", "वह", "यहाँ", "वहाँ", "देखो", "देखिए"]),
    (GestureKind::Emphasis, &["महत्वपूर्ण", "याद रखें", "सुनिए", "ध्यान"]),
    (GestureKind::Questioning, &["क्या", "कैसे", "क्यों", "कब", "कहाँ", "कौन"]),
    (GestureKind::Explaining, &["क्योंकि", "इसलिए", "अतः"]),
    (GestureKind::Greeting, &["नमस्ते", "हैलो", "स्वागत"]),
    (GestureKind::Thinking, &["सोचना", "विचार", "हम्म"]),
];

/// Fixed per-subtype cue strength
fn base_params(subtype: CueSubtype) -> (f32, f32) {
    match subtype {
        CueSubtype::Gesture(_) => (2.0, 0.8),
        CueSubtype::Emotion(_) => (2.0, 0.7),
    }
}

/// Scan cleaned text for emotion cues
pub fn scan_emotion_cues(cleaned: &str, language: Language) -> Vec<TextCue> {
    let table = match language {
        Language::En => EMOTION_TRIGGERS_EN,
        Language::Hi => EMOTION_TRIGGERS_HI,
    };
    let lower = lowercase_chars(cleaned);
    let mut cues = Vec::new();
    for (kind, words) in table {
        for word in *words {
            emit_matches(&lower, word, CueSubtype::Emotion(*kind), &mut cues);
        }
    }
    cues.sort_by_key(|c| c.anchor_offset);
    cues
}

/// Scan cleaned text for gesture cues
pub fn scan_gesture_cues(cleaned: &str, language: Language) -> Vec<TextCue> {
    let table = match language {
        Language::En => GESTURE_TRIGGERS_EN,
        Language::Hi => GESTURE_TRIGGERS_HI,
    };
    let lower = lowercase_chars(cleaned);
    let mut cues = Vec::new();
    for (kind, words) in table {
        for word in *words {
            emit_matches(&lower, word, CueSubtype::Gesture(*kind), &mut cues);
        }
    }
    cues.sort_by_key(|c| c.anchor_offset);
    cues
}

/// Per-character lowercase, preserving character count so offsets into the
/// lowered text remain valid offsets into the cleaned text
fn lowercase_chars(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

fn emit_matches(lower: &[char], trigger: &str, subtype: CueSubtype, out: &mut Vec<TextCue>) {
    let needle: Vec<char> = trigger.chars().collect();
    if needle.is_empty() || needle.len() > lower.len() {
        return;
    }
    let (duration, intensity) = base_params(subtype);
    for offset in 0..=(lower.len() - needle.len()) {
        if lower[offset..offset + needle.len()] == needle[..] {
            out.push(TextCue {
                subtype,
                anchor_offset: offset,
                trigger_token: trigger.to_string(),
                base_duration: duration,
                base_intensity: intensity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_cue() {
        let cues = scan_gesture_cues("Hello there, friend.", Language::En);
        let greeting: Vec<_> = cues
            .iter()
            .filter(|c| c.subtype == CueSubtype::Gesture(GestureKind::Greeting))
            .collect();
        assert!(!greeting.is_empty());
        assert_eq!(greeting[0].anchor_offset, 0);
        assert_eq!(greeting[0].base_intensity, 0.8);
        assert_eq!(greeting[0].base_duration, 2.0);
    }

    #[test]
    fn test_every_occurrence_emits() {
        let cues = scan_gesture_cues("look here, look there", Language::En);
        let looks: Vec<_> = cues.iter().filter(|c| c.trigger_token == "look").collect();
        assert_eq!(looks.len(), 2);
        assert!(looks[0].anchor_offset < looks[1].anchor_offset);
    }

    #[test]
    fn test_cues_sorted_by_offset() {
        let cues = scan_gesture_cues("remember why you came here", Language::En);
        for pair in cues.windows(2) {
            assert!(pair[0].anchor_offset <= pair[1].anchor_offset);
        }
    }

    #[test]
    fn test_emotion_cues() {
        let cues = scan_emotion_cues("I am so happy and excited!", Language::En);
        assert!(cues
            .iter()
            .any(|c| c.subtype == CueSubtype::Emotion(EmotionKind::Happy)));
        assert_eq!(cues[0].base_intensity, 0.7);
    }

    #[test]
    fn test_hindi_triggers() {
        let cues = scan_gesture_cues("नमस्ते दुनिया", Language::Hi);
        assert!(cues
            .iter()
            .any(|c| c.subtype == CueSubtype::Gesture(GestureKind::Greeting)));
    }

    #[test]
    fn test_no_cues_in_plain_text() {
        let cues = scan_gesture_cues("a b c d", Language::En);
        assert!(cues.is_empty());
    }

    #[test]
    fn test_case_insensitive_match() {
        let cues = scan_gesture_cues("LOOK at it", Language::En);
        assert!(cues.iter().any(|c| c.trigger_token == "look"));
    }
}
