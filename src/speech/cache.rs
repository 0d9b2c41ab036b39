//! File-backed waveform cache
//!
//! Entries are JSON artifacts keyed by a SHA-256 digest over everything
//! that influences the output waveform. Reads and writes are best-effort:
//! a corrupt or unwritable cache degrades to re-synthesis, never to a
//! pipeline failure.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::phoneme::PhonemeEvent;
use crate::text::Language;

/// Everything persisted for one synthesis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheArtifact {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub duration: f32,
    pub phonemes: Vec<PhonemeEvent>,
    pub engine_id: String,
    pub language: Language,
    pub voice_style: String,
    /// Whether the cached samples went through the post-processing chain
    pub post_processed: bool,
}

/// Running cache counters, readable at any time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub write_failures: u64,
}

pub struct WaveformCache {
    dir: PathBuf,
    hits: AtomicU64,
    misses: AtomicU64,
    write_failures: AtomicU64,
}

/// Hex SHA-256 over the full identity of a synthesis request
pub fn cache_key(text: &str, language: Language, voice_style: &str, engine_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([0]);
    hasher.update(language.code().as_bytes());
    hasher.update([0]);
    hasher.update(voice_style.as_bytes());
    hasher.update([0]);
    hasher.update(engine_id.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

impl WaveformCache {
    /// Open a cache rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Look up an entry; any read or parse failure counts as a miss
    pub fn load(&self, key: &str) -> Option<CacheArtifact> {
        let path = self.entry_path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };
        match serde_json::from_slice::<CacheArtifact>(&bytes) {
            Ok(artifact) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache hit");
                Some(artifact)
            }
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt cache entry");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Persist an entry via write-temp-then-rename; failures are logged
    /// and counted, never propagated
    pub fn store(&self, key: &str, artifact: &CacheArtifact) {
        if let Err(e) = self.try_store(key, artifact) {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
            warn!(key, error = %e, "cache write failed");
        }
    }

    fn try_store(&self, key: &str, artifact: &CacheArtifact) -> std::io::Result<()> {
        let bytes = serde_json::to_vec(artifact)?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let tmp = self
            .dir
            .join(format!(".{}.{}-{}.tmp", key, std::process::id(), nanos));
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, self.entry_path(key))?;
        debug!(key, bytes = bytes.len(), "cache entry written");
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for WaveformCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformCache")
            .field("dir", &self.dir)
            .field("stats", &self.stats())
            .finish()
    }
}
