//! Timeline data model handed to the rig-animation collaborator

use serde::{Deserialize, Serialize};

/// Keyframe interpolation mode, applied per track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Linear,
    Smooth,
}

/// One keyframe: frame index and channel values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub value: Vec<f32>,
    pub interpolation: Interpolation,
}

/// A single animation channel addressed by name
///
/// The rig collaborator maps `track_id` onto actual rig topology; this
/// crate only guarantees the fixed channel names it emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: String,
    pub keyframes: Vec<Keyframe>,
}

impl Track {
    /// Frames are strictly increasing within a track
    pub fn frames_monotonic(&self) -> bool {
        self.keyframes.windows(2).all(|w| w[0].frame < w[1].frame)
    }
}

/// Complete animation timeline for one narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub tracks: Vec<Track>,
    pub frame_rate: u32,
    pub total_frames: u32,
}

impl Timeline {
    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }
}

// Channel names contracted with the rig collaborator.
pub const TRACK_HEAD_PITCH: &str = "head_pitch";
pub const TRACK_HEAD_YAW: &str = "head_yaw";
pub const TRACK_HEAD_ROLL: &str = "head_roll";
pub const TRACK_JAW_OPEN: &str = "jaw_open";
pub const TRACK_MOUTH_WIDE: &str = "mouth_wide";
pub const TRACK_SPINE_SCALE_Z: &str = "spine_scale_z";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_monotonic() {
        let track = Track {
            track_id: TRACK_HEAD_YAW.to_string(),
            keyframes: vec![
                Keyframe {
                    frame: 0,
                    value: vec![0.0],
                    interpolation: Interpolation::Smooth,
                },
                Keyframe {
                    frame: 12,
                    value: vec![0.24],
                    interpolation: Interpolation::Smooth,
                },
            ],
        };
        assert!(track.frames_monotonic());
    }

    #[test]
    fn test_serde_roundtrip() {
        let timeline = Timeline {
            tracks: vec![Track {
                track_id: TRACK_SPINE_SCALE_Z.to_string(),
                keyframes: vec![Keyframe {
                    frame: 0,
                    value: vec![1.0],
                    interpolation: Interpolation::Smooth,
                }],
            }],
            frame_rate: 24,
            total_frames: 96,
        };
        let json = serde_json::to_string(&timeline).unwrap();
        assert!(json.contains("\"smooth\""));
        let back: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timeline);
    }

    #[test]
    fn test_track_lookup() {
        let timeline = Timeline {
            tracks: Vec::new(),
            frame_rate: 24,
            total_frames: 0,
        };
        assert!(timeline.track(TRACK_JAW_OPEN).is_none());
    }
}
