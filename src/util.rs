//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```), if any.
/// Text without fences is returned trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
  let s = raw.trim();
  let Some(rest) = s.strip_prefix("```") else { return s };
  // Drop the info string ("json", "JSON", ...) up to the first newline.
  let body = match rest.find('\n') {
    Some(nl) => &rest[nl + 1..],
    None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
  };
  body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_key() {
    let out = fill_template("{count} about {subject} ({count})", &[("count", "3"), ("subject", "History")]);
    assert_eq!(out, "3 about History (3)");
  }

  #[test]
  fn strips_json_fence() {
    let raw = "```json\n{\"questions\": []}\n```\n";
    assert_eq!(strip_code_fences(raw), "{\"questions\": []}");
  }

  #[test]
  fn strips_bare_fence_and_leaves_plain_text() {
    assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
    assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    let s = "ééééé";
    let t = trunc_for_log(s, 3);
    assert!(t.starts_with('é'));
    assert!(t.ends_with("(10 bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
