use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::parse::RawCue;

pub const MERGE_THRESHOLD_MS: i64 = 200;

static BRACKET: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(.*?)\s*[(（【\[](.*?)[)）】\]]\s*$").unwrap());

static DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)\s*[/]\s*(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedLine {
  #[serde(rename = "time")]
  pub time_ms: i64,
  #[serde(rename = "mainText")]
  pub primary: String,
  #[serde(rename = "subText")]
  pub secondary: String,
}

/// `main (sub)`, also with `（）`, `【】` or `[]`.
pub fn match_bracket(text: &str) -> Option<(String, String)> {
  split_with(&BRACKET, text)
}

/// `main / sub`, split at the first slash.
pub fn match_delimiter(text: &str) -> Option<(String, String)> {
  split_with(&DELIMITER, text)
}

fn split_with(re: &Regex, text: &str) -> Option<(String, String)> {
  let c = re.captures(text)?;
  let main = c.get(1)?.as_str().trim().to_string();
  let sub = c.get(2)?.as_str().trim().to_string();
  Some((main, sub))
}

fn classify(time_ms: i64, text: &str) -> TimedLine {
  let (primary, secondary) = match_bracket(text)
    .or_else(|| match_delimiter(text))
    .unwrap_or_else(|| (text.to_string(), String::new()));
  TimedLine { time_ms, primary, secondary }
}

pub fn consolidate(cues: Vec<RawCue>) -> Vec<TimedLine> {
  consolidate_with(cues, MERGE_THRESHOLD_MS)
}

pub fn consolidate_with(mut cues: Vec<RawCue>, threshold_ms: i64) -> Vec<TimedLine> {
  // stable: equal timestamps keep discovery order
  cues.sort_by_key(|c| c.time_ms);

  let mut lines: Vec<TimedLine> = Vec::with_capacity(cues.len());
  let mut prev_ms: Option<i64> = None;

  for cue in cues {
    let near_prev = prev_ms.is_some_and(|p| (cue.time_ms - p).abs() < threshold_ms);
    prev_ms = Some(cue.time_ms);

    if near_prev {
      if let Some(last) = lines.last_mut() {
        if last.primary == cue.text || last.secondary == cue.text {
          continue;
        }
        if last.secondary.is_empty() {
          last.secondary = cue.text;
        } else {
          last.secondary.push('\n');
          last.secondary.push_str(&cue.text);
        }
        continue;
      }
    }

    lines.push(classify(cue.time_ms, &cue.text));
  }

  lines
}
