use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

static LRC_TAG: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\[([0-9]{1,2}):([0-9]{1,2})(?:\.([0-9]{1,3}))?\]").unwrap());

static CUE_START: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"([0-9]{1,2}):([0-9]{1,2}):([0-9]{1,2})(?:[.,]([0-9]{1,3}))?").unwrap());

/// One timestamp occurrence and the text it applies to, before consolidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCue {
  pub time_ms: i64,
  pub text: String,
}

/// A `[m:s]` / `[m:s.f]` tag found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrcTag {
  pub time_ms: i64,
  pub span: Range<usize>,
}

pub fn match_lrc_tags(line: &str) -> Vec<LrcTag> {
  LRC_TAG
    .captures_iter(line)
    .map(|c| {
      let min = field(&c, 1);
      let sec = field(&c, 2);
      let ms = match c.get(3) {
        // centiseconds
        Some(f) if f.as_str().len() == 2 => field(&c, 3) * 10,
        Some(_) => field(&c, 3),
        None => 0,
      };
      LrcTag {
        time_ms: min * 60_000 + sec * 1_000 + ms,
        span: c.get(0).map(|m| m.range()).unwrap_or(0..0),
      }
    })
    .collect()
}

/// Leading `hh:mm:ss[.,]ms` token of an SRT/VTT timing line, in ms.
/// Only the first timestamp on the line counts; the `-->` end is ignored.
pub fn match_cue_start(line: &str) -> Option<i64> {
  let c = CUE_START.captures(line)?;
  Some(field(&c, 1) * 3_600_000 + field(&c, 2) * 60_000 + field(&c, 3) * 1_000 + field(&c, 4))
}

/// `line` with exactly the given byte ranges removed.
pub fn strip_spans(line: &str, spans: &[Range<usize>]) -> String {
  let mut out = String::with_capacity(line.len());
  let mut pos = 0;
  for span in spans {
    if span.start >= pos {
      out.push_str(&line[pos..span.start]);
    }
    pos = pos.max(span.end);
  }
  out.push_str(&line[pos..]);
  out
}

// Unparseable numeric fields count as zero.
fn field(c: &Captures, idx: usize) -> i64 {
  c.get(idx).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn is_sequence_number(line: &str) -> bool {
  line.parse::<i64>().is_ok()
}

pub fn parse(text: &str) -> Vec<RawCue> {
  let mut out = Vec::new();
  let mut lines = text.lines().map(str::trim);

  while let Some(line) = lines.next() {
    if line.is_empty() {
      continue;
    }

    let tags = match_lrc_tags(line);
    if !tags.is_empty() {
      let spans: Vec<Range<usize>> = tags.iter().map(|t| t.span.clone()).collect();
      let payload = strip_spans(line, &spans).trim().to_string();
      out.extend(tags.into_iter().map(|t| RawCue { time_ms: t.time_ms, text: payload.clone() }));
      continue;
    }

    if let Some(start_ms) = match_cue_start(line) {
      let mut body = String::new();
      for sub in lines.by_ref() {
        if sub.is_empty() {
          break;
        }
        if body.is_empty() && is_sequence_number(sub) {
          continue;
        }
        if !body.is_empty() {
          body.push('\n');
        }
        body.push_str(sub);
      }

      if !body.is_empty() {
        out.push(RawCue { time_ms: start_ms, text: body });
      }
    }
  }

  out
}
