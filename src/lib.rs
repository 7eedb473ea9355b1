//! Line-timed lyrics for a local audio file.
//!
//! Finds the `.lrc` / `.srt` / `.vtt` file next to the track, guesses its
//! encoding, parses every timestamp syntax into one timeline and folds
//! near-simultaneous cues (original + translation) into primary/secondary
//! pairs. Results are cached per lyric file until its mtime changes.

pub mod config;
pub mod error;
pub mod lyrics;

pub use config::{EngineConfig, Fallback};
pub use error::{LyricError, Result};
pub use lyrics::{CacheStats, LyricEngine, TimedLine};
