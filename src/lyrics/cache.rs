use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::consolidate::TimedLine;

struct CacheEntry {
  modified: SystemTime,
  lines: Arc<Vec<TimedLine>>,
}

/// Parsed lyrics per lyric file, valid only while the file's mtime matches.
///
/// Entries are replaced on mtime change and never evicted. Check-then-store
/// is not atomic: two callers racing on a stale entry both parse and the
/// last store wins.
#[derive(Default)]
pub struct LyricCache {
  entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl LyricCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lookup(&self, path: &Path, modified: SystemTime) -> Option<Arc<Vec<TimedLine>>> {
    let entries = self.entries.read();
    let entry = entries.get(path)?;
    (entry.modified == modified).then(|| Arc::clone(&entry.lines))
  }

  pub fn store(&self, path: PathBuf, modified: SystemTime, lines: Vec<TimedLine>) -> Arc<Vec<TimedLine>> {
    let lines = Arc::new(lines);
    self
      .entries
      .write()
      .insert(path, CacheEntry { modified, lines: Arc::clone(&lines) });
    lines
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
