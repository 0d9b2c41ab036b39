//! Command-line front end: text in, WAV and timeline JSON out

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vocamotion::speech::save_wav;
use vocamotion::{AspectRatio, Language, Pipeline, PipelineConfig, QualityTier, RenderRequest};

#[derive(Parser)]
#[command(name = "vocamotion", about = "Narrated character animation pipeline", version)]
struct Cli {
    /// Text to narrate
    text: String,

    /// Language hint (en, hi); auto-detected when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Speech engine id
    #[arg(short, long, default_value = "formant")]
    engine: String,

    /// Voice style tag passed to the backend
    #[arg(long, default_value = "default")]
    voice_style: String,

    /// Target aspect ratio (wide16x9, tall9x16, square)
    #[arg(long, default_value = "wide16x9")]
    aspect_ratio: String,

    /// Quality tier (hd720, hd1080, uhd4k)
    #[arg(long, default_value = "hd1080")]
    quality: String,

    /// Waveform cache directory; omit to disable caching
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Output directory for narration.wav and timeline.json
    #[arg(short, long, default_value = "out")]
    output: PathBuf,
}

fn parse_aspect_ratio(s: &str) -> anyhow::Result<AspectRatio> {
    match s {
        "wide16x9" => Ok(AspectRatio::Wide16x9),
        "tall9x16" => Ok(AspectRatio::Tall9x16),
        "square" => Ok(AspectRatio::Square),
        other => anyhow::bail!("unknown aspect ratio '{}'", other),
    }
}

fn parse_quality(s: &str) -> anyhow::Result<QualityTier> {
    match s {
        "hd720" => Ok(QualityTier::Hd720),
        "hd1080" => Ok(QualityTier::Hd1080),
        "uhd4k" => Ok(QualityTier::Uhd4k),
        other => anyhow::bail!("unknown quality tier '{}'", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::default();
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }

    let mut request = RenderRequest::new(&cli.text)
        .with_engine(&cli.engine)
        .with_voice_style(&cli.voice_style)
        .with_aspect_ratio(parse_aspect_ratio(&cli.aspect_ratio)?)
        .with_quality(parse_quality(&cli.quality)?);
    if let Some(code) = &cli.language {
        let language = Language::from_code(code)
            .with_context(|| format!("unsupported language '{}'", code))?;
        request = request.with_language_hint(language);
    }

    let pipeline = Pipeline::new(config);
    info!(engines = ?pipeline.engine_ids(), "available speech engines");

    let output = pipeline.run(&request).await?;

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;

    let wav_path = cli.output.join("narration.wav");
    save_wav(&output.audio.samples, output.audio.sample_rate, &wav_path)?;

    let timeline_path = cli.output.join("timeline.json");
    let json = serde_json::to_string_pretty(&output.timeline)?;
    std::fs::write(&timeline_path, json)
        .with_context(|| format!("failed to write {}", timeline_path.display()))?;

    println!(
        "language: {} ({:?}, confidence {:.2})",
        output.text.language.language, output.text.language.source, output.text.language.confidence
    );
    println!(
        "engine: {}{}",
        output.audio.engine.used_id,
        if output.audio.engine.fallback {
            " (fallback)"
        } else {
            ""
        }
    );
    println!(
        "audio: {:.2}s, {} phonemes -> {}",
        output.audio.duration,
        output.audio.phonemes.len(),
        wav_path.display()
    );
    println!(
        "timeline: {} tracks, {} frames -> {}",
        output.timeline.tracks.len(),
        output.timeline.total_frames,
        timeline_path.display()
    );

    Ok(())
}
