//! Cue-to-timeline mapping
//!
//! Turns character-offset cues and phoneme events into frame-indexed
//! keyframe tracks. Cue timestamps come from a uniform speaking-rate
//! approximation: offset into the cleaned text, scaled by total audio
//! duration. Coarse, but monotonic, which is the property the rig needs.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::core::config::PipelineConfig;
use crate::core::error::{PipelineError, Result};
use crate::phoneme::{mouth_shape, MouthShape, PhonemeEvent};
use crate::text::{CueSubtype, GestureKind, TextCue};
use crate::timeline::types::{
    Interpolation, Keyframe, Timeline, Track, TRACK_HEAD_PITCH, TRACK_HEAD_ROLL, TRACK_HEAD_YAW,
    TRACK_JAW_OPEN, TRACK_MOUTH_WIDE, TRACK_SPINE_SCALE_Z,
};

const POINTING_YAW_PEAK: f32 = 0.3;
const EMPHASIS_PITCH_DIP: f32 = -0.2;
const QUESTIONING_ROLL_PEAK: f32 = 0.2;
const THINKING_PITCH_SWING: f32 = 0.1;
const THINKING_YAW_SWING: f32 = 0.15;

/// Keyframe accumulator for one channel; same-frame inserts overwrite,
/// so processing cues in ascending start order gives last-write-wins.
struct ChannelBuf {
    track_id: &'static str,
    interpolation: Interpolation,
    keys: BTreeMap<u32, Vec<f32>>,
}

impl ChannelBuf {
    fn new(track_id: &'static str, interpolation: Interpolation) -> Self {
        Self {
            track_id,
            interpolation,
            keys: BTreeMap::new(),
        }
    }

    fn insert(&mut self, frame: u32, total_frames: u32, value: f32) {
        self.keys.insert(frame.min(total_frames), vec![value]);
    }

    fn into_track(self) -> Option<Track> {
        if self.keys.is_empty() {
            return None;
        }
        let interpolation = self.interpolation;
        Some(Track {
            track_id: self.track_id.to_string(),
            keyframes: self
                .keys
                .into_iter()
                .map(|(frame, value)| Keyframe {
                    frame,
                    value,
                    interpolation,
                })
                .collect(),
        })
    }
}

pub struct TimelineMapper {
    config: Arc<PipelineConfig>,
}

impl TimelineMapper {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    /// Build the timeline for one narration
    ///
    /// `cleaned_char_len` is the character count of the cleaned text the
    /// cue anchors index into. Inconsistent inputs are a hard error, not
    /// something to clamp quietly.
    pub fn build(
        &self,
        cues: &[TextCue],
        phonemes: &[PhonemeEvent],
        cleaned_char_len: usize,
        total_duration: f32,
    ) -> Result<Timeline> {
        if !total_duration.is_finite() || total_duration < 0.0 {
            return Err(PipelineError::Mapping {
                message: format!("invalid total duration {}", total_duration),
            });
        }
        if !cues.is_empty() && cleaned_char_len == 0 {
            return Err(PipelineError::Mapping {
                message: "cues present but cleaned text is empty".to_string(),
            });
        }
        if let Some(bad) = cues.iter().find(|c| c.anchor_offset > cleaned_char_len) {
            return Err(PipelineError::Mapping {
                message: format!(
                    "cue anchor {} is outside cleaned text of length {}",
                    bad.anchor_offset, cleaned_char_len
                ),
            });
        }

        let fps = self.config.frame_rate;
        let total_frames = (total_duration * fps as f32).ceil() as u32;

        let mut pitch = ChannelBuf::new(TRACK_HEAD_PITCH, Interpolation::Smooth);
        let mut yaw = ChannelBuf::new(TRACK_HEAD_YAW, Interpolation::Smooth);
        let mut roll = ChannelBuf::new(TRACK_HEAD_ROLL, Interpolation::Smooth);
        let mut jaw = ChannelBuf::new(TRACK_JAW_OPEN, Interpolation::Linear);
        let mut wide = ChannelBuf::new(TRACK_MOUTH_WIDE, Interpolation::Linear);
        let mut spine = ChannelBuf::new(TRACK_SPINE_SCALE_Z, Interpolation::Smooth);

        let mut gestures: Vec<&TextCue> = cues
            .iter()
            .filter(|c| matches!(c.subtype, CueSubtype::Gesture(_)))
            .collect();
        gestures.sort_by(|a, b| a.anchor_offset.cmp(&b.anchor_offset));

        for cue in gestures {
            let timestamp =
                cue.anchor_offset as f32 / cleaned_char_len as f32 * total_duration;
            let start = (timestamp * fps as f32) as u32;
            let end = ((timestamp + cue.base_duration) * fps as f32) as u32;
            let i = cue.base_intensity;

            let CueSubtype::Gesture(kind) = cue.subtype else {
                continue;
            };
            match kind {
                GestureKind::Pointing => {
                    rise_and_return(&mut yaw, start, end, total_frames, i * POINTING_YAW_PEAK);
                }
                GestureKind::Emphasis => {
                    rise_and_return(&mut pitch, start, end, total_frames, i * EMPHASIS_PITCH_DIP);
                }
                GestureKind::Questioning => {
                    rise_and_return(&mut roll, start, end, total_frames, i * QUESTIONING_ROLL_PEAK);
                }
                GestureKind::Thinking => {
                    oscillation(&mut pitch, start, end, total_frames, i * THINKING_PITCH_SWING);
                    oscillation(&mut yaw, start, end, total_frames, -i * THINKING_YAW_SWING);
                }
                // No head-track shape is defined for these; the cue still
                // exists in ProcessedText for downstream consumers.
                GestureKind::Explaining | GestureKind::Greeting => {}
            }
        }

        for event in phonemes {
            let frame = (event.start_time * fps as f32).round() as u32;
            let (jaw_scale, wide_scale) = lip_scales(mouth_shape(&event.unit), event.intensity);
            jaw.insert(frame, total_frames, jaw_scale);
            wide.insert(frame, total_frames, wide_scale);
        }

        self.breathing_cycle(&mut spine, total_frames);

        let tracks: Vec<Track> = [pitch, yaw, roll, jaw, wide, spine]
            .into_iter()
            .filter_map(ChannelBuf::into_track)
            .collect();

        debug!(
            track_count = tracks.len(),
            total_frames, "built animation timeline"
        );
        Ok(Timeline {
            tracks,
            frame_rate: fps,
            total_frames,
        })
    }

    /// Neutral-peak-neutral scale oscillation repeated across the clip
    fn breathing_cycle(&self, spine: &mut ChannelBuf, total_frames: u32) {
        let period = ((self.config.breathing_period_secs * self.config.frame_rate as f32) as u32)
            .max(2);
        let peak = 1.0 + self.config.breathing_amplitude;
        let mut frame = 0;
        while frame < total_frames {
            spine.insert(frame, total_frames, 1.0);
            spine.insert(frame + period / 2, total_frames, peak);
            spine.insert(frame + period, total_frames, 1.0);
            frame += period;
        }
    }
}

/// Zero at both ends with a single peak at the midpoint
fn rise_and_return(channel: &mut ChannelBuf, start: u32, end: u32, total_frames: u32, peak: f32) {
    let mid = (start + end) / 2;
    channel.insert(start, total_frames, 0.0);
    channel.insert(mid, total_frames, peak);
    channel.insert(end, total_frames, 0.0);
}

/// Zero at both ends with opposite swings at the quarter points
fn oscillation(channel: &mut ChannelBuf, start: u32, end: u32, total_frames: u32, swing: f32) {
    let span = end - start;
    channel.insert(start, total_frames, 0.0);
    channel.insert(start + span / 4, total_frames, -swing);
    channel.insert(start + span / 2, total_frames, 0.0);
    channel.insert(start + 3 * span / 4, total_frames, swing);
    channel.insert(end, total_frames, 0.0);
}

/// Target scales for the two mouth channels per viseme class
fn lip_scales(shape: MouthShape, intensity: f32) -> (f32, f32) {
    match shape {
        MouthShape::A | MouthShape::O => (1.0 + intensity * 0.5, 1.0 + intensity * 0.3),
        MouthShape::E | MouthShape::I => (1.0 + intensity * 0.3, 1.0 - intensity * 0.2),
        MouthShape::M => (1.0 - intensity * 0.2, 1.0),
        _ => (1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> TimelineMapper {
        TimelineMapper::new(Arc::new(PipelineConfig::default()))
    }

    fn gesture_cue(kind: GestureKind, anchor: usize) -> TextCue {
        TextCue {
            subtype: CueSubtype::Gesture(kind),
            anchor_offset: anchor,
            trigger_token: "token".to_string(),
            base_duration: 2.0,
            base_intensity: 0.8,
        }
    }

    fn phoneme(unit: &str, start: f32) -> PhonemeEvent {
        PhonemeEvent {
            unit: unit.to_string(),
            start_time: start,
            duration: 0.1,
            intensity: 0.8,
        }
    }

    #[test]
    fn test_total_frames_is_ceiling() {
        let timeline = mapper().build(&[], &[], 0, 1.01).unwrap();
        assert_eq!(timeline.total_frames, 25);
    }

    #[test]
    fn test_gesture_starts_and_ends_at_zero() {
        let cues = vec![gesture_cue(GestureKind::Pointing, 5)];
        let timeline = mapper().build(&cues, &[], 20, 10.0).unwrap();
        let yaw = timeline.track(TRACK_HEAD_YAW).unwrap();
        assert_eq!(yaw.keyframes.first().unwrap().value, vec![0.0]);
        assert_eq!(yaw.keyframes.last().unwrap().value, vec![0.0]);
        let peak = yaw
            .keyframes
            .iter()
            .map(|k| k.value[0])
            .fold(0.0_f32, f32::max);
        assert!((peak - 0.8 * POINTING_YAW_PEAK).abs() < 1e-6);
    }

    #[test]
    fn test_gesture_axes_are_distinct() {
        let cues = vec![
            gesture_cue(GestureKind::Pointing, 2),
            gesture_cue(GestureKind::Emphasis, 8),
            gesture_cue(GestureKind::Questioning, 14),
        ];
        let timeline = mapper().build(&cues, &[], 20, 12.0).unwrap();
        assert!(timeline.track(TRACK_HEAD_YAW).is_some());
        assert!(timeline.track(TRACK_HEAD_PITCH).is_some());
        assert!(timeline.track(TRACK_HEAD_ROLL).is_some());
        let pitch = timeline.track(TRACK_HEAD_PITCH).unwrap();
        let min = pitch
            .keyframes
            .iter()
            .map(|k| k.value[0])
            .fold(0.0_f32, f32::min);
        assert!((min - 0.8 * EMPHASIS_PITCH_DIP).abs() < 1e-6);
    }

    #[test]
    fn test_thinking_uses_two_axes_with_interior_keys() {
        let cues = vec![gesture_cue(GestureKind::Thinking, 5)];
        let timeline = mapper().build(&cues, &[], 20, 10.0).unwrap();
        let pitch = timeline.track(TRACK_HEAD_PITCH).unwrap();
        let yaw = timeline.track(TRACK_HEAD_YAW).unwrap();
        assert_eq!(pitch.keyframes.len(), 5);
        assert_eq!(yaw.keyframes.len(), 5);
        assert_eq!(pitch.keyframes.first().unwrap().value, vec![0.0]);
        assert_eq!(pitch.keyframes.last().unwrap().value, vec![0.0]);
        // Opposite-phase swings on the two axes.
        assert!(pitch.keyframes[1].value[0] < 0.0);
        assert!(yaw.keyframes[1].value[0] > 0.0);
    }

    #[test]
    fn test_cue_timestamps_monotonic_in_anchor() {
        let cues = vec![
            gesture_cue(GestureKind::Pointing, 2),
            gesture_cue(GestureKind::Pointing, 30),
            gesture_cue(GestureKind::Pointing, 60),
        ];
        let timeline = mapper().build(&cues, &[], 80, 20.0).unwrap();
        let yaw = timeline.track(TRACK_HEAD_YAW).unwrap();
        assert!(yaw.frames_monotonic());
    }

    #[test]
    fn test_overlapping_cues_later_wins_on_shared_frames() {
        // 20 chars over 10 s puts the cues at 2.0 s and 3.0 s, so their
        // 2 s windows collide on head_yaw: the first cue's peak frame (72)
        // is the second cue's start, and the first cue's end frame (96) is
        // the second cue's peak.
        let cues = vec![
            gesture_cue(GestureKind::Pointing, 4),
            gesture_cue(GestureKind::Pointing, 6),
        ];
        let timeline = mapper().build(&cues, &[], 20, 10.0).unwrap();
        let yaw = timeline.track(TRACK_HEAD_YAW).unwrap();
        assert!(yaw.frames_monotonic());

        let value_at = |frame: u32| {
            yaw.keyframes
                .iter()
                .find(|k| k.frame == frame)
                .map(|k| k.value[0])
        };
        // Later cue's zero start replaced the earlier cue's peak.
        assert_eq!(value_at(72), Some(0.0));
        // Later cue's peak replaced the earlier cue's zero end.
        let peak = 0.8 * POINTING_YAW_PEAK;
        assert!((value_at(96).unwrap() - peak).abs() < 1e-6);
        // Later cue's own end is untouched.
        assert_eq!(value_at(120), Some(0.0));
    }

    #[test]
    fn test_lip_tracks_from_phonemes() {
        let phonemes = vec![phoneme("A", 0.5), phoneme("M", 1.0)];
        let timeline = mapper().build(&[], &phonemes, 0, 2.0).unwrap();
        let jaw = timeline.track(TRACK_JAW_OPEN).unwrap();
        let wide = timeline.track(TRACK_MOUTH_WIDE).unwrap();
        assert_eq!(jaw.keyframes[0].frame, 12);
        assert!((jaw.keyframes[0].value[0] - 1.4).abs() < 1e-6);
        assert!((wide.keyframes[0].value[0] - 1.24).abs() < 1e-6);
        assert!((jaw.keyframes[1].value[0] - (1.0 - 0.8 * 0.2)).abs() < 1e-6);
        assert_eq!(jaw.keyframes[1].interpolation, Interpolation::Linear);
    }

    #[test]
    fn test_breathing_track_always_present() {
        let timeline = mapper().build(&[], &[], 0, 10.0).unwrap();
        let spine = timeline.track(TRACK_SPINE_SCALE_Z).unwrap();
        assert!(spine.frames_monotonic());
        assert_eq!(spine.keyframes[0].value, vec![1.0]);
        let peak = spine
            .keyframes
            .iter()
            .map(|k| k.value[0])
            .fold(0.0_f32, f32::max);
        assert!((peak - 1.05).abs() < 1e-6);
    }

    #[test]
    fn test_frames_clamped_to_total() {
        // Cue near the end of the clip, so its 2s window runs past it.
        let cues = vec![gesture_cue(GestureKind::Pointing, 19)];
        let timeline = mapper().build(&cues, &[], 20, 4.0).unwrap();
        for track in &timeline.tracks {
            for key in &track.keyframes {
                assert!(key.frame <= timeline.total_frames);
            }
        }
    }

    #[test]
    fn test_anchor_past_text_is_an_error() {
        let cues = vec![gesture_cue(GestureKind::Pointing, 25)];
        let err = mapper().build(&cues, &[], 20, 4.0).unwrap_err();
        assert!(matches!(err, PipelineError::Mapping { .. }));
    }

    #[test]
    fn test_cues_with_empty_text_is_an_error() {
        let cues = vec![gesture_cue(GestureKind::Pointing, 0)];
        assert!(mapper().build(&cues, &[], 0, 4.0).is_err());
    }

    #[test]
    fn test_negative_duration_is_an_error() {
        assert!(mapper().build(&[], &[], 0, -1.0).is_err());
    }

    #[test]
    fn test_emotion_cues_produce_no_head_tracks() {
        let cues = vec![TextCue {
            subtype: CueSubtype::Emotion(crate::text::EmotionKind::Happy),
            anchor_offset: 3,
            trigger_token: "happy".to_string(),
            base_duration: 2.0,
            base_intensity: 0.7,
        }];
        let timeline = mapper().build(&cues, &[], 20, 4.0).unwrap();
        assert!(timeline.track(TRACK_HEAD_YAW).is_none());
        assert!(timeline.track(TRACK_HEAD_PITCH).is_none());
    }

    #[test]
    fn test_zero_duration_yields_empty_frame_range() {
        let timeline = mapper().build(&[], &[], 0, 0.0).unwrap();
        assert_eq!(timeline.total_frames, 0);
        assert!(timeline.track(TRACK_SPINE_SCALE_Z).is_none());
    }
}
