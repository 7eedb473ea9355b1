use std::fs;
use std::path::{Path, PathBuf};

fn candidate_names(audio_name: &str, stem: &str, extensions: &[String]) -> Vec<String> {
  let mut names = Vec::with_capacity(extensions.len() * 2);
  for base in [audio_name, stem] {
    for ext in extensions {
      names.push(format!("{base}.{ext}"));
    }
  }
  names
}

/// Finds the lyric file belonging to `audio_path`.
///
/// 1) `<name.ext>.<lyric ext>` then `<name>.<lyric ext>` next to the audio
/// 2) first file in the directory (by name) with a lyric extension whose
///    lowercased name contains the lowercased audio stem
pub fn find_lyric_file(audio_path: &Path, extensions: &[String]) -> Option<PathBuf> {
  let dir = match audio_path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  let audio_name = audio_path.file_name()?.to_string_lossy().into_owned();
  let stem = match audio_name.rfind('.') {
    Some(i) => audio_name[..i].to_string(),
    None => audio_name.clone(),
  };

  for name in candidate_names(&audio_name, &stem, extensions) {
    let p = dir.join(&name);
    if p.is_file() {
      return Some(p);
    }
  }

  let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir).ok()?.filter_map(|r| r.ok()).collect();
  entries.sort_by_key(|e| e.file_name());

  let target = stem.to_lowercase();
  let suffixes: Vec<String> = extensions.iter().map(|e| format!(".{e}")).collect();

  for e in entries {
    if e.file_type().map(|t| t.is_dir()).unwrap_or(true) {
      continue;
    }
    let name = e.file_name().to_string_lossy().to_lowercase();
    if suffixes.iter().any(|s| name.ends_with(s.as_str())) && name.contains(&target) {
      return Some(e.path());
    }
  }

  None
}
