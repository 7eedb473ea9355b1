use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::config::EngineConfig;
use crate::error::{LyricError, Result};

pub mod cache;
pub mod consolidate;
pub mod decode;
pub mod formats;
pub mod locate;
pub mod parse;

pub use cache::LyricCache;
pub use consolidate::TimedLine;
pub use parse::RawCue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
  pub hits: u64,
  pub parses: u64,
}

/// Audio path in, timed lines out. Owns its cache, so independent engines
/// never share state.
pub struct LyricEngine {
  config: EngineConfig,
  cache: LyricCache,
  hits: AtomicU64,
  parses: AtomicU64,
}

impl Default for LyricEngine {
  fn default() -> Self {
    Self::new(EngineConfig::default())
  }
}

impl LyricEngine {
  pub fn new(config: EngineConfig) -> Self {
    Self {
      config,
      cache: LyricCache::new(),
      hits: AtomicU64::new(0),
      parses: AtomicU64::new(0),
    }
  }

  pub fn stats(&self) -> CacheStats {
    CacheStats {
      hits: self.hits.load(Ordering::Relaxed),
      parses: self.parses.load(Ordering::Relaxed),
    }
  }

  pub fn find_lyric_file(&self, audio_path: &Path) -> Option<PathBuf> {
    locate::find_lyric_file(audio_path, &self.config.extensions)
  }

  /// Lines for the lyric file next to `audio_path`, sorted by time.
  /// Empty when there is no lyric file or it can't be read.
  pub fn get_lyrics_for(&self, audio_path: impl AsRef<Path>) -> Vec<TimedLine> {
    let audio_path = audio_path.as_ref();
    if audio_path.as_os_str().is_empty() {
      return Vec::new();
    }

    let Some(lyric_path) = self.find_lyric_file(audio_path) else {
      log::debug!("no lyric file for {}", audio_path.display());
      return Vec::new();
    };

    match self.load_cached(lyric_path) {
      Ok(lines) => lines,
      Err(e) => {
        log::warn!("lyrics unavailable: {e}");
        Vec::new()
      }
    }
  }

  fn load_cached(&self, lyric_path: PathBuf) -> Result<Vec<TimedLine>> {
    let modified = modified_time(&lyric_path)?;

    if let Some(lines) = self.cache.lookup(&lyric_path, modified) {
      self.hits.fetch_add(1, Ordering::Relaxed);
      log::debug!("cache hit for {}", lyric_path.display());
      return Ok(lines.as_ref().clone());
    }

    let bytes = std::fs::read(&lyric_path).map_err(|e| LyricError::io(&lyric_path, e))?;
    self.parses.fetch_add(1, Ordering::Relaxed);
    let lines = parse_lyrics(&bytes, &self.config);
    log::info!("parsed {} lines from {}", lines.len(), lyric_path.display());

    let stored = self.cache.store(lyric_path, modified, lines);
    Ok(stored.as_ref().clone())
  }
}

/// The uncached pipeline: decode, parse, consolidate.
pub fn parse_lyrics(bytes: &[u8], config: &EngineConfig) -> Vec<TimedLine> {
  let text = decode::resolve(bytes, config);
  let cues = parse::parse(&text);
  consolidate::consolidate_with(cues, config.merge_threshold_ms)
}

fn modified_time(path: &Path) -> Result<SystemTime> {
  std::fs::metadata(path)
    .and_then(|m| m.modified())
    .map_err(|e| LyricError::io(path, e))
}
