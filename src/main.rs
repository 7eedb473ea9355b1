use clap::{Parser, ValueEnum};
use lyric_sync::lyrics::formats;
use lyric_sync::{EngineConfig, LyricEngine, TimedLine};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
  Json,
  Lrc,
  Text,
}

/// Print the synced lyrics belonging to an audio file.
#[derive(Parser, Debug)]
#[command(name = "lyric-sync", version)]
struct Cli {
  /// Audio file; the lyric file is looked up next to it.
  audio: PathBuf,

  #[arg(long, value_enum, default_value_t = Format::Json)]
  format: Format,

  /// JSON engine config (mergeThresholdMs, extensions, latinFallback, unknownFallback).
  #[arg(long)]
  config: Option<PathBuf>,

  /// Keep polling every N ms and re-print when the lyrics change.
  #[arg(long, value_name = "MS")]
  watch: Option<u64>,
}

fn render(lines: &[TimedLine], format: Format) -> Result<String, String> {
  match format {
    Format::Json => formats::to_json(lines).map_err(|e| format!("JSON encode failed: {e}")),
    Format::Lrc => Ok(formats::to_lrc(lines)),
    Format::Text => Ok(formats::to_text(lines)),
  }
}

async fn fetch_lyrics(engine: Arc<LyricEngine>, audio: PathBuf) -> Result<Vec<TimedLine>, String> {
  tokio::task::spawn_blocking(move || engine.get_lyrics_for(&audio))
    .await
    .map_err(|e| format!("lookup task failed: {e}"))
}

async fn watch(engine: Arc<LyricEngine>, cli: &Cli, every_ms: u64) -> Result<(), String> {
  let mut ticker = tokio::time::interval(Duration::from_millis(every_ms.max(1)));
  let mut last: Option<Vec<TimedLine>> = None;

  loop {
    tokio::select! {
      _ = ticker.tick() => {
        let lines = fetch_lyrics(Arc::clone(&engine), cli.audio.clone()).await?;
        if last.as_ref() != Some(&lines) {
          println!("{}", render(&lines, cli.format)?);
          last = Some(lines);
        }
      }
      _ = tokio::signal::ctrl_c() => {
        let stats = engine.stats();
        log::info!("stopping watch ({} cache hits, {} parses)", stats.hits, stats.parses);
        return Ok(());
      }
    }
  }
}

#[tokio::main]
async fn main() -> Result<(), String> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

  let cli = Cli::parse();

  let config = match &cli.config {
    Some(path) => EngineConfig::load(path).map_err(|e| e.to_string())?,
    None => EngineConfig::default(),
  };
  let engine = Arc::new(LyricEngine::new(config));

  match cli.watch {
    Some(every_ms) => watch(engine, &cli, every_ms).await,
    None => {
      let lines = fetch_lyrics(engine, cli.audio.clone()).await?;
      print!("{}", render(&lines, cli.format)?);
      if matches!(cli.format, Format::Json) {
        println!();
      }
      Ok(())
    }
  }
}
