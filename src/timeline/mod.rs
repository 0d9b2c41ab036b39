//! Animation timeline: data model and cue-to-keyframe mapping

pub mod mapper;
pub mod types;

pub use mapper::TimelineMapper;
pub use types::{
    Interpolation, Keyframe, Timeline, Track, TRACK_HEAD_PITCH, TRACK_HEAD_ROLL, TRACK_HEAD_YAW,
    TRACK_JAW_OPEN, TRACK_MOUTH_WIDE, TRACK_SPINE_SCALE_Z,
};
