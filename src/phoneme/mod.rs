//! Phoneme extraction from synthesized waveforms
//!
//! Backends here produce no phoneme-level alignment, so mouth cues are
//! recovered from the waveform itself: short-window RMS energy finds
//! syllable onsets, and each onset is assigned a unit from a fixed cycle.
//! The result is coarse but stable, which is what a lip-sync track needs.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window hop as a fraction of a second (10 ms)
const HOP_SECS: f32 = 0.01;
/// Absolute RMS floor below which a frame is never an onset
const ONSET_FLOOR: f32 = 0.02;
/// A frame must exceed the trailing average by this ratio to count
const ONSET_RATIO: f32 = 1.6;
/// Minimum spacing between onsets
const MIN_ONSET_GAP_SECS: f32 = 0.06;
/// Smoothing factor for the trailing energy average
const ENERGY_SMOOTHING: f32 = 0.9;
/// Duration assigned to the final detected phoneme
const FINAL_PHONEME_SECS: f32 = 0.2;

/// Units assigned to onsets, in order
const UNIT_CYCLE: [&str; 8] = ["A", "E", "I", "O", "U", "M", "B", "P"];

/// One mouth event with time in seconds from the start of the clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeEvent {
    pub unit: String,
    pub start_time: f32,
    pub duration: f32,
    pub intensity: f32,
}

impl PhonemeEvent {
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }
}

/// Viseme classes a phoneme unit maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouthShape {
    A,
    E,
    I,
    O,
    U,
    M,
    F,
    Th,
    S,
    L,
    T,
    K,
    Closed,
}

/// Map a phoneme unit onto its viseme class
pub fn mouth_shape(unit: &str) -> MouthShape {
    match unit {
        "A" => MouthShape::A,
        "E" => MouthShape::E,
        "I" => MouthShape::I,
        "O" => MouthShape::O,
        "U" => MouthShape::U,
        "B" | "P" | "M" => MouthShape::M,
        "F" | "V" => MouthShape::F,
        "TH" => MouthShape::Th,
        "S" | "Z" => MouthShape::S,
        "L" | "R" => MouthShape::L,
        "T" | "D" | "N" => MouthShape::T,
        "K" | "G" => MouthShape::K,
        _ => MouthShape::Closed,
    }
}

fn is_vowel_unit(unit: &str) -> bool {
    matches!(unit, "A" | "E" | "I" | "O" | "U")
}

/// Articulation intensity for a unit: open vowels loudest, silence zero
pub fn unit_intensity(unit: &str) -> f32 {
    if unit.is_empty() {
        0.0
    } else if is_vowel_unit(unit) {
        0.8
    } else {
        0.6
    }
}

/// Energy-based phoneme extractor
#[derive(Debug, Default)]
pub struct PhonemeExtractor;

impl PhonemeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract phoneme events from a mono waveform
    ///
    /// Events never overlap: each one ends exactly where the next starts,
    /// and only the last carries a fixed default duration.
    pub fn extract(&self, samples: &[f32], sample_rate: u32) -> Vec<PhonemeEvent> {
        if samples.is_empty() || sample_rate == 0 {
            return Vec::new();
        }

        let hop = ((sample_rate as f32 * HOP_SECS) as usize).max(1);
        let onsets = self.detect_onsets(samples, sample_rate, hop);

        let mut events = Vec::with_capacity(onsets.len());
        for (i, &start) in onsets.iter().enumerate() {
            let duration = match onsets.get(i + 1) {
                Some(&next) => next - start,
                None => FINAL_PHONEME_SECS,
            };
            let unit = UNIT_CYCLE[i % UNIT_CYCLE.len()].to_string();
            let intensity = unit_intensity(&unit);
            events.push(PhonemeEvent {
                unit,
                start_time: start,
                duration,
                intensity,
            });
        }

        debug!(onset_count = events.len(), "extracted phoneme events");
        events
    }

    fn detect_onsets(&self, samples: &[f32], sample_rate: u32, hop: usize) -> Vec<f32> {
        let mut onsets = Vec::new();
        let mut trailing = 0.0_f32;
        let mut last_onset = f32::NEG_INFINITY;

        for (frame_idx, window) in samples.chunks(hop).enumerate() {
            let rms = (window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32).sqrt();
            let t = frame_idx as f32 * hop as f32 / sample_rate as f32;

            let is_onset = rms > ONSET_FLOOR
                && rms > trailing * ONSET_RATIO
                && t - last_onset >= MIN_ONSET_GAP_SECS;
            if is_onset {
                onsets.push(t);
                last_onset = t;
            }
            trailing = trailing * ENERGY_SMOOTHING + rms * (1.0 - ENERGY_SMOOTHING);
        }
        onsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bursts of tone separated by silence, one burst per expected onset
    fn pulsed_signal(bursts: usize, sample_rate: u32) -> Vec<f32> {
        let mut samples = Vec::new();
        let tone_len = (sample_rate as f32 * 0.1) as usize;
        let gap_len = (sample_rate as f32 * 0.15) as usize;
        for _ in 0..bursts {
            for i in 0..tone_len {
                let t = i as f32 / sample_rate as f32;
                samples.push((std::f32::consts::TAU * 220.0 * t).sin() * 0.8);
            }
            samples.resize(samples.len() + gap_len, 0.0);
        }
        samples
    }

    #[test]
    fn test_detects_one_onset_per_burst() {
        let extractor = PhonemeExtractor::new();
        let events = extractor.extract(&pulsed_signal(4, 16_000), 16_000);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_units_follow_cycle() {
        let extractor = PhonemeExtractor::new();
        let events = extractor.extract(&pulsed_signal(4, 16_000), 16_000);
        let units: Vec<&str> = events.iter().map(|e| e.unit.as_str()).collect();
        assert_eq!(units, vec!["A", "E", "I", "O"]);
    }

    #[test]
    fn test_events_never_overlap() {
        let extractor = PhonemeExtractor::new();
        let events = extractor.extract(&pulsed_signal(6, 16_000), 16_000);
        for pair in events.windows(2) {
            assert!(pair[0].end_time() <= pair[1].start_time + 1e-6);
            assert!(pair[0].duration > 0.0);
        }
    }

    #[test]
    fn test_final_event_default_duration() {
        let extractor = PhonemeExtractor::new();
        let events = extractor.extract(&pulsed_signal(3, 16_000), 16_000);
        let last = events.last().unwrap();
        assert!((last.duration - FINAL_PHONEME_SECS).abs() < 1e-6);
    }

    #[test]
    fn test_silence_produces_no_events() {
        let extractor = PhonemeExtractor::new();
        assert!(extractor.extract(&vec![0.0; 16_000], 16_000).is_empty());
        assert!(extractor.extract(&[], 16_000).is_empty());
    }

    #[test]
    fn test_mouth_shape_table() {
        assert_eq!(mouth_shape("A"), MouthShape::A);
        assert_eq!(mouth_shape("B"), MouthShape::M);
        assert_eq!(mouth_shape("P"), MouthShape::M);
        assert_eq!(mouth_shape("V"), MouthShape::F);
        assert_eq!(mouth_shape("TH"), MouthShape::Th);
        assert_eq!(mouth_shape("Z"), MouthShape::S);
        assert_eq!(mouth_shape("R"), MouthShape::L);
        assert_eq!(mouth_shape("D"), MouthShape::T);
        assert_eq!(mouth_shape("G"), MouthShape::K);
        assert_eq!(mouth_shape(""), MouthShape::Closed);
        assert_eq!(mouth_shape("??"), MouthShape::Closed);
    }

    #[test]
    fn test_intensity_classes() {
        assert_eq!(unit_intensity("A"), 0.8);
        assert_eq!(unit_intensity("M"), 0.6);
        assert_eq!(unit_intensity(""), 0.0);
    }
}
