//! Speech synthesis: backends, registry, cache, post-processing, output

pub mod cache;
pub mod espeak;
pub mod formant;
pub mod output;
pub mod postprocess;
pub mod registry;
pub mod synthesizer;
pub mod traits;

pub use cache::{cache_key, CacheArtifact, CacheStats, WaveformCache};
pub use espeak::{EspeakEngine, ESPEAK_ENGINE_ID};
pub use formant::{FormantEngine, FORMANT_ENGINE_ID};
pub use output::save_wav;
pub use registry::EngineRegistry;
pub use synthesizer::SpeechSynthesizer;
pub use traits::{EngineInfo, EngineSelection, RawAudio, SpeechAudio, SpeechEngine};
