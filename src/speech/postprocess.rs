//! Waveform post-processing: normalize, trim, fade, resample

use tracing::debug;

use crate::core::error::{AudioOperation, PipelineError, Result};

pub const NORMALIZE_TARGET_PEAK: f32 = 0.95;

/// Scale samples so the absolute peak sits at the target level
pub fn peak_normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
    if peak <= f32::EPSILON {
        return;
    }
    let gain = NORMALIZE_TARGET_PEAK / peak;
    for s in samples.iter_mut() {
        *s *= gain;
    }
}

/// Trim leading and trailing samples below a peak-relative threshold
///
/// The threshold is relative to the clip's own peak, so quiet recordings
/// trim the same way loud ones do. All-quiet input is returned unchanged.
pub fn trim_silence(samples: Vec<f32>, relative_threshold: f32) -> Vec<f32> {
    let peak = samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
    if peak <= f32::EPSILON {
        return samples;
    }
    let floor = peak * relative_threshold;
    let start = samples.iter().position(|s| s.abs() > floor);
    let end = samples.iter().rposition(|s| s.abs() > floor);
    match (start, end) {
        (Some(start), Some(end)) if start <= end => samples[start..=end].to_vec(),
        _ => samples,
    }
}

/// Apply linear fade-in and fade-out over the given window
///
/// The window is clamped to half the clip so the two ramps never cross.
pub fn apply_fades(samples: &mut [f32], sample_rate: u32, fade_ms: u32) {
    let fade = ((sample_rate as u64 * fade_ms as u64) / 1000) as usize;
    let fade = fade.min(samples.len() / 2);
    if fade == 0 {
        return;
    }
    for i in 0..fade {
        let gain = i as f32 / fade as f32;
        samples[i] *= gain;
        let j = samples.len() - 1 - i;
        samples[j] *= gain;
    }
}

/// Linear-interpolation resampler
///
/// Adequate for speech handed to an animation pipeline; a polyphase
/// resampler would be overkill here.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(PipelineError::Audio {
            message: format!("invalid sample rate {} -> {}", from_rate, to_rate),
            operation: AudioOperation::Resampling,
        });
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = samples[idx.min(samples.len() - 1)];
        let b = samples[(idx + 1).min(samples.len() - 1)];
        out.push(a + (b - a) * frac);
    }
    Ok(out)
}

/// Full post-processing chain: normalize, trim, fade
///
/// Callers treat failure as non-fatal and keep the unprocessed audio.
pub fn post_process(
    samples: Vec<f32>,
    sample_rate: u32,
    silence_threshold: f32,
    fade_ms: u32,
) -> Result<Vec<f32>> {
    if samples.is_empty() {
        return Err(PipelineError::Audio {
            message: "empty waveform".to_string(),
            operation: AudioOperation::PostProcessing,
        });
    }
    let mut samples = samples;
    peak_normalize(&mut samples);
    let before = samples.len();
    let mut samples = trim_silence(samples, silence_threshold);
    debug!(
        trimmed = before - samples.len(),
        remaining = samples.len(),
        "post-processed waveform"
    );
    apply_fades(&mut samples, sample_rate, fade_ms);
    Ok(samples)
}
