//! WAV file output

use std::path::Path;

use tracing::info;

use crate::core::error::{AudioOperation, PipelineError, Result};

/// Write mono f32 samples as a 16-bit PCM WAV file
pub fn save_wav(samples: &[f32], sample_rate: u32, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| PipelineError::Audio {
        message: format!("failed to create {}: {}", path.display(), e),
        operation: AudioOperation::Saving,
    })?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(|e| PipelineError::Audio {
            message: format!("failed to write sample: {}", e),
            operation: AudioOperation::Saving,
        })?;
    }
    writer.finalize().map_err(|e| PipelineError::Audio {
        message: format!("failed to finalize {}: {}", path.display(), e),
        operation: AudioOperation::Saving,
    })?;
    info!(path = %path.display(), samples = samples.len(), "wrote WAV file");
    Ok(())
}
