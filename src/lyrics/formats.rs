use super::consolidate::TimedLine;

/// One `[mm:ss.xx]` line for the primary text and one per secondary line,
/// all sharing the tag so the output consolidates back to the same pairs.
pub fn to_lrc(lines: &[TimedLine]) -> String {
  let mut out = String::new();
  for l in lines {
    let tag = fmt_lrc_time(l.time_ms);
    out.push_str(&format!("[{tag}]{}\n", l.primary));
    for sub in l.secondary.lines().filter(|s| !s.is_empty()) {
      out.push_str(&format!("[{tag}]{sub}\n"));
    }
  }
  out
}

pub fn to_text(lines: &[TimedLine]) -> String {
  let mut out = String::new();
  for l in lines {
    let main = l.primary.replace('\n', " / ");
    if l.secondary.is_empty() {
      out.push_str(&format!("{}  {}\n", fmt_clock(l.time_ms), main));
    } else {
      let sub = l.secondary.replace('\n', " / ");
      out.push_str(&format!("{}  {} | {}\n", fmt_clock(l.time_ms), main, sub));
    }
  }
  out
}

pub fn to_json(lines: &[TimedLine]) -> Result<String, serde_json::Error> {
  serde_json::to_string_pretty(lines)
}

// (minutes, seconds, millis); negative times clamp to zero
fn clock_parts(ms: i64) -> (i64, i64, i64) {
  let ms = ms.max(0);
  (ms / 60_000, ms / 1_000 % 60, ms % 1_000)
}

fn fmt_lrc_time(ms: i64) -> String {
  let (m, s, millis) = clock_parts(ms);
  format!("{m:02}:{s:02}.{:02}", millis / 10)
}

fn fmt_clock(ms: i64) -> String {
  let (m, s, millis) = clock_parts(ms);
  format!("{m:02}:{s:02}.{millis:03}")
}
