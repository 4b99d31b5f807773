//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// No nested/conditional logic.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Remove Markdown code fences that models wrap JSON in.
/// Every "```" is dropped, together with a directly following "json" tag (any case),
/// and the result is trimmed. Text without fences only gets trimmed.
pub fn strip_code_fences(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut rest = text.trim();
  while let Some(pos) = rest.find("```") {
    out.push_str(&rest[..pos]);
    rest = &rest[pos + 3..];
    if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
      rest = &rest[4..];
    }
  }
  out.push_str(rest);
  out.trim().to_string()
}

/// Log-safe truncation for large strings (char boundary aware).
/// Avoids spamming logs with huge model responses.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  match s.char_indices().nth(max_chars) {
    None => s.to_string(),
    Some((idx, _)) => format!("{}… ({} bytes total)", &s[..idx], s.len()),
  }
}
