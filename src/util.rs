//! Small utility helpers used across modules.

use chrono::NaiveDate;

/// Server-local calendar date, used as the wizard's default evaluation date.
pub fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    s.to_string()
  } else {
    let cut = s.char_indices().take_while(|(i, _)| *i < max).last().map_or(0, |(i, c)| i + c.len_utf8());
    format!("{}… ({} bytes total)", &s[..cut], s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncation_respects_char_boundaries() {
    let s = "evaluación de matemática";
    assert_eq!(trunc_for_log(s, 200), s);
    let t = trunc_for_log(s, 12);
    assert!(t.starts_with("evaluació"));
    assert!(t.contains("bytes total"));
  }
}
