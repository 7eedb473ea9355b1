use chardetng::EncodingDetector;
use encoding_rs::{Encoding, BIG5, EUC_JP, GB18030, GBK, SHIFT_JIS, UTF_8, WINDOWS_1252};

use crate::config::{EngineConfig, Fallback};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Charset families the resolver routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
  Utf8,
  ShiftJis,
  EucJp,
  Gbk,
  Big5,
  Latin1,
  Other(&'static Encoding),
}

impl Charset {
  fn from_encoding(enc: &'static Encoding) -> Self {
    if enc == UTF_8 {
      Charset::Utf8
    } else if enc == SHIFT_JIS {
      Charset::ShiftJis
    } else if enc == EUC_JP {
      Charset::EucJp
    } else if enc == GBK || enc == GB18030 {
      Charset::Gbk
    } else if enc == BIG5 {
      Charset::Big5
    } else if enc == WINDOWS_1252 {
      // encoding_rs folds the ISO-8859-1 label into windows-1252
      Charset::Latin1
    } else {
      Charset::Other(enc)
    }
  }
}

/// Statistical guess over the whole byte sample.
pub fn detect_charset(bytes: &[u8]) -> Charset {
  let mut detector = EncodingDetector::new();
  detector.feed(bytes, true);
  Charset::from_encoding(detector.guess(None, true))
}

/// Turns raw lyric file bytes into text. Never fails; the worst case is a
/// lossy UTF-8 reinterpretation.
pub fn resolve(bytes: &[u8], cfg: &EngineConfig) -> String {
  if bytes.is_empty() {
    return String::new();
  }

  if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
    return String::from_utf8_lossy(rest).into_owned();
  }

  if let Ok(s) = std::str::from_utf8(bytes) {
    return s.to_string();
  }

  let charset = detect_charset(bytes);
  log::debug!("charset detector guessed {charset:?}");
  decode_as(bytes, charset, cfg)
}

pub fn decode_as(bytes: &[u8], charset: Charset, cfg: &EngineConfig) -> String {
  let encoding = match charset {
    Charset::Utf8 => return String::from_utf8_lossy(bytes).into_owned(),
    Charset::ShiftJis => SHIFT_JIS,
    Charset::EucJp => EUC_JP,
    Charset::Gbk => GBK,
    Charset::Big5 => BIG5,
    // legacy route is GBK, even though Latin-1 text is not CJK
    Charset::Latin1 => match fallback_encoding(cfg.latin_fallback) {
      Some(enc) => enc,
      None => return String::from_utf8_lossy(bytes).into_owned(),
    },
    Charset::Other(enc) => {
      log::debug!("no route for {}, using {:?}", enc.name(), cfg.unknown_fallback);
      match fallback_encoding(cfg.unknown_fallback) {
        Some(enc) => enc,
        None => return String::from_utf8_lossy(bytes).into_owned(),
      }
    }
  };

  // malformed sequences become U+FFFD; the rest of the text survives
  let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
  if had_errors {
    log::debug!("{} decode replaced malformed input", encoding.name());
  }
  text.into_owned()
}

fn fallback_encoding(fallback: Fallback) -> Option<&'static Encoding> {
  match fallback {
    Fallback::Gbk => Some(GBK),
    Fallback::Utf8Lossy => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cfg() -> EngineConfig {
    EngineConfig::default()
  }

  #[test]
  fn empty_input_is_empty_text() {
    assert_eq!(resolve(&[], &cfg()), "");
  }

  #[test]
  fn bom_is_stripped() {
    let mut bytes = UTF8_BOM.to_vec();
    bytes.extend_from_slice("[00:01.00]歌".as_bytes());
    assert_eq!(resolve(&bytes, &cfg()), "[00:01.00]歌");
  }

  #[test]
  fn valid_utf8_passes_through() {
    let text = "[00:01.00]こんにちは\n[00:02.00]Hello";
    assert_eq!(resolve(text.as_bytes(), &cfg()), text);
  }

  #[test]
  fn routed_decoders() {
    let (gbk, _, _) = GBK.encode("你好世界");
    assert_eq!(decode_as(&gbk, Charset::Gbk, &cfg()), "你好世界");

    let (sjis, _, _) = SHIFT_JIS.encode("こんにちは");
    assert_eq!(decode_as(&sjis, Charset::ShiftJis, &cfg()), "こんにちは");

    let (eucjp, _, _) = EUC_JP.encode("さようなら");
    assert_eq!(decode_as(&eucjp, Charset::EucJp, &cfg()), "さようなら");

    let (big5, _, _) = BIG5.encode("歌詞");
    assert_eq!(decode_as(&big5, Charset::Big5, &cfg()), "歌詞");
  }

  #[test]
  fn latin_guess_follows_config() {
    let (gbk, _, _) = GBK.encode("中文");
    assert_eq!(decode_as(&gbk, Charset::Latin1, &cfg()), "中文");

    let lossy = EngineConfig { latin_fallback: Fallback::Utf8Lossy, ..cfg() };
    let out = decode_as(&[b'a', 0xE9, b'b'], Charset::Latin1, &lossy);
    assert_eq!(out, "a\u{FFFD}b");
  }

  #[test]
  fn malformed_sequence_is_replaced_in_place() {
    // 0x81 opens a GBK double-byte sequence; 0x20 cannot continue it
    let bytes = [b'x', 0x81, 0x20];
    assert_eq!(decode_as(&bytes, Charset::Gbk, &cfg()), "x\u{FFFD} ");
  }

  #[test]
  fn stray_byte_keeps_rest_of_gbk_file() {
    let text = "[00:01.00]我们一起去看海吧\n[00:05.00]天空中的星星在闪烁\n";
    let (encoded, _, _) = GBK.encode(text);
    let mut bytes = encoded.into_owned();
    bytes.push(0x81);

    let out = decode_as(&bytes, Charset::Gbk, &cfg());
    assert_eq!(out, format!("{text}\u{FFFD}"));

    let lossy = EngineConfig { unknown_fallback: Fallback::Utf8Lossy, ..cfg() };
    let raw = decode_as(&bytes, Charset::Other(encoding_rs::EUC_KR), &lossy);
    assert!(!raw.contains("我们"));
  }

  #[test]
  fn arbitrary_bytes_always_resolve() {
    let samples: [&[u8]; 4] = [
      &[0xFF, 0xFE, 0x00, 0x80],
      &[0x80; 17],
      &[0xC3],
      &[0xEF, 0xBB],
    ];
    for bytes in samples {
      let _ = resolve(bytes, &cfg());
    }
  }

  #[test]
  fn detects_shift_jis_lyrics() {
    let text = "[00:01.00]あなたのことをずっと思っています\n\
                [00:05.00]夜空の星がきらきらと光っている\n\
                [00:09.00]わたしはここでまっているよ\n";
    let (bytes, _, _) = SHIFT_JIS.encode(text);
    assert_eq!(detect_charset(&bytes), Charset::ShiftJis);
    assert_eq!(resolve(&bytes, &cfg()), text);
  }
}
