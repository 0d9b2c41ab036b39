//! Built-in procedural formant synthesizer
//!
//! Always available: no model files, no external processes. Produces a
//! deterministic robotic voice by summing a fundamental with two formant
//! partials per vowel and a filtered pseudo-noise burst per consonant.
//! This keeps the pipeline fully testable on machines with no TTS backend
//! installed.

use std::f32::consts::TAU;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::speech::traits::{EngineInfo, RawAudio, SpeechEngine};
use crate::text::Language;

pub const FORMANT_ENGINE_ID: &str = "formant";

const VOWEL_SECS: f32 = 0.12;
const CONSONANT_SECS: f32 = 0.07;
const GAP_SECS: f32 = 0.04;
const PAUSE_SECS: f32 = 0.25;
const BASE_PITCH_HZ: f32 = 110.0;

/// First and second formant frequencies per vowel, rough adult male values
fn vowel_formants(ch: char) -> Option<(f32, f32)> {
    match ch {
        'a' => Some((730.0, 1090.0)),
        'e' => Some((530.0, 1840.0)),
        'i' => Some((270.0, 2290.0)),
        'o' => Some((570.0, 840.0)),
        'u' => Some((300.0, 870.0)),
        _ => None,
    }
}

pub struct FormantEngine {
    info: EngineInfo,
}

impl FormantEngine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            info: EngineInfo {
                id: FORMANT_ENGINE_ID.to_string(),
                name: "Formant".to_string(),
                description: "Built-in procedural formant synthesizer".to_string(),
                native_sample_rate: sample_rate,
                languages: Language::all().to_vec(),
            },
        }
    }

    fn render(&self, text: &str, voice_style: &str) -> Vec<f32> {
        let rate = self.info.native_sample_rate as f32;
        // Style shifts the base pitch so distinct styles cache separately
        // and are audibly distinct.
        let pitch = BASE_PITCH_HZ * (1.0 + 0.08 * (style_seed(voice_style) % 5) as f32);
        let mut samples = Vec::new();

        for ch in text.to_lowercase().chars() {
            if let Some((f1, f2)) = vowel_formants(ch) {
                self.push_voiced(&mut samples, pitch, f1, f2, VOWEL_SECS, 0.5);
                self.push_silence(&mut samples, GAP_SECS * 0.5);
            } else if ch.is_alphanumeric() {
                self.push_buzz(&mut samples, ch, CONSONANT_SECS, 0.25);
                self.push_silence(&mut samples, GAP_SECS * 0.5);
            } else if matches!(ch, '.' | '!' | '?' | ',') {
                self.push_silence(&mut samples, PAUSE_SECS);
            } else if ch.is_whitespace() {
                self.push_silence(&mut samples, GAP_SECS * 2.0);
            }
        }

        // Never return a zero-length buffer: downstream duration math and
        // WAV output expect at least one frame of audio.
        if samples.is_empty() {
            samples.resize((rate * GAP_SECS) as usize, 0.0);
        }
        samples
    }

    fn push_voiced(&self, out: &mut Vec<f32>, pitch: f32, f1: f32, f2: f32, secs: f32, amp: f32) {
        let rate = self.info.native_sample_rate as f32;
        let n = (rate * secs) as usize;
        for i in 0..n {
            let t = i as f32 / rate;
            let env = segment_envelope(i, n);
            let v = (TAU * pitch * t).sin() * 0.6
                + (TAU * f1 * t).sin() * 0.3
                + (TAU * f2 * t).sin() * 0.1;
            out.push(v * env * amp);
        }
    }

    fn push_buzz(&self, out: &mut Vec<f32>, ch: char, secs: f32, amp: f32) {
        let rate = self.info.native_sample_rate as f32;
        let n = (rate * secs) as usize;
        // Deterministic pseudo-noise seeded by the character, so identical
        // input text always yields bit-identical audio.
        let mut state = 0x9E37_79B9_u32.wrapping_add(ch as u32);
        let mut prev = 0.0_f32;
        for i in 0..n {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let white = (state >> 8) as f32 / (1 << 24) as f32 * 2.0 - 1.0;
            // One-pole lowpass keeps the burst from sounding like raw hiss.
            prev = prev * 0.7 + white * 0.3;
            out.push(prev * segment_envelope(i, n) * amp);
        }
    }

    fn push_silence(&self, out: &mut Vec<f32>, secs: f32) {
        let n = (self.info.native_sample_rate as f32 * secs) as usize;
        out.resize(out.len() + n, 0.0);
    }
}

fn segment_envelope(i: usize, n: usize) -> f32 {
    if n == 0 {
        return 0.0;
    }
    let attack = n / 8;
    let release = n / 4;
    if i < attack {
        i as f32 / attack.max(1) as f32
    } else if i + release > n {
        (n - i) as f32 / release.max(1) as f32
    } else {
        1.0
    }
}

fn style_seed(style: &str) -> u32 {
    style.bytes().fold(0_u32, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as u32)
    })
}

#[async_trait]
impl SpeechEngine for FormantEngine {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    async fn synthesize(
        &self,
        text: &str,
        _language: Language,
        voice_style: &str,
    ) -> Result<RawAudio> {
        Ok(RawAudio {
            samples: self.render(text, voice_style),
            sample_rate: self.info.native_sample_rate,
        })
    }
}
