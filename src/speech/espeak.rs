//! espeak-ng subprocess backend
//!
//! Shells out to the system `espeak-ng` binary and parses the WAV stream
//! it writes to stdout. Availability is probed once; a missing binary
//! simply leaves this engine unregistered.

use std::io::Cursor;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::core::error::{PipelineError, Result};
use crate::speech::traits::{EngineInfo, RawAudio, SpeechEngine};
use crate::text::Language;

pub const ESPEAK_ENGINE_ID: &str = "espeak";

const ESPEAK_BINARY: &str = "espeak-ng";

fn voice_for(language: Language) -> &'static str {
    match language {
        Language::En => "en",
        Language::Hi => "hi",
    }
}

/// Speaking rate in words per minute passed to espeak-ng per style
fn rate_for(voice_style: &str) -> u32 {
    match voice_style {
        "slow" => 120,
        "fast" => 210,
        _ => 160,
    }
}

pub struct EspeakEngine {
    info: EngineInfo,
}

impl EspeakEngine {
    pub fn new() -> Self {
        Self {
            info: EngineInfo {
                id: ESPEAK_ENGINE_ID.to_string(),
                name: "eSpeak NG".to_string(),
                description: "System espeak-ng subprocess backend".to_string(),
                native_sample_rate: 22_050,
                languages: Language::all().to_vec(),
            },
        }
    }

    /// Check whether the espeak-ng binary is runnable on this machine
    pub fn probe() -> bool {
        let available = std::process::Command::new(ESPEAK_BINARY)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        debug!(available, "probed espeak-ng");
        available
    }

    fn decode_wav(&self, bytes: &[u8]) -> Result<RawAudio> {
        let mut reader =
            hound::WavReader::new(Cursor::new(bytes)).map_err(|e| PipelineError::Synthesis {
                engine_id: ESPEAK_ENGINE_ID.to_string(),
                message: format!("invalid WAV output: {}", e),
            })?;
        let spec = reader.spec();
        let samples: Vec<f32> = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<i16>, _>>()
            .map_err(|e| PipelineError::Synthesis {
                engine_id: ESPEAK_ENGINE_ID.to_string(),
                message: format!("failed to read WAV samples: {}", e),
            })?
            .into_iter()
            .map(|s| s as f32 / i16::MAX as f32)
            .collect();
        Ok(RawAudio {
            samples,
            sample_rate: spec.sample_rate,
        })
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        voice_style: &str,
    ) -> Result<RawAudio> {
        let mut child = Command::new(ESPEAK_BINARY)
            .arg("--stdout")
            .arg("-v")
            .arg(voice_for(language))
            .arg("-s")
            .arg(rate_for(voice_style).to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PipelineError::Synthesis {
                engine_id: ESPEAK_ENGINE_ID.to_string(),
                message: format!("failed to spawn {}: {}", ESPEAK_BINARY, e),
            })?;

        let mut bytes = Vec::new();
        if let Some(stdout) = child.stdout.as_mut() {
            stdout
                .read_to_end(&mut bytes)
                .await
                .map_err(|e| PipelineError::Synthesis {
                    engine_id: ESPEAK_ENGINE_ID.to_string(),
                    message: format!("failed to read subprocess output: {}", e),
                })?;
        }
        let status = child.wait().await.map_err(|e| PipelineError::Synthesis {
            engine_id: ESPEAK_ENGINE_ID.to_string(),
            message: format!("subprocess wait failed: {}", e),
        })?;
        if !status.success() {
            return Err(PipelineError::Synthesis {
                engine_id: ESPEAK_ENGINE_ID.to_string(),
                message: format!("{} exited with {}", ESPEAK_BINARY, status),
            });
        }

        self.decode_wav(&bytes)
    }
}
