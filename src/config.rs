use serde::Deserialize;
use std::path::Path;

use crate::error::{LyricError, Result};

/// How bytes are decoded when the charset detector cannot give a usable
/// CJK/UTF-8 answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fallback {
  /// Legacy behavior: decode as GBK.
  Gbk,
  /// Reinterpret the raw bytes as UTF-8, replacing invalid sequences.
  Utf8Lossy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
  /// Cues closer than this (in ms) to the previous cue are folded into the
  /// previous line as secondary text.
  pub merge_threshold_ms: i64,
  /// Lyric file extensions, lowercase and without the dot, in probe order.
  pub extensions: Vec<String>,
  /// Decoder used when the detector guesses ISO-8859-1 / windows-1252.
  pub latin_fallback: Fallback,
  /// Decoder used when detection fails or names a charset we don't route.
  pub unknown_fallback: Fallback,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      merge_threshold_ms: 200,
      extensions: vec!["lrc".into(), "srt".into(), "vtt".into()],
      latin_fallback: Fallback::Gbk,
      unknown_fallback: Fallback::Gbk,
    }
  }
}

impl EngineConfig {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path).map_err(|e| LyricError::io(path, e))?;
    Self::from_json(&raw)
  }

  pub fn from_json(raw: &str) -> Result<Self> {
    let mut cfg: EngineConfig = serde_json::from_str(raw)?;
    cfg.extensions = cfg
      .extensions
      .iter()
      .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
      .filter(|e| !e.is_empty())
      .collect();
    Ok(cfg)
  }
}
