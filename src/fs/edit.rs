//! Pure text transforms backing the text-edit actions.
//!
//! Matching is exact-substring, first occurrence only. No fuzzy or structural
//! matching: a match inside a comment or string literal counts, which is an
//! accepted trade-off of the instruction format. Each function returns `None`
//! when the needle is absent so callers can route to the step's alternative.

/// Replace the first exact occurrence of `find` with `replace`.
#[must_use]
pub fn find_and_replace_first(haystack: &str, find: &str, replace: &str) -> Option<String> {
    if find.is_empty() || !haystack.contains(find) {
        return None;
    }
    Some(haystack.replacen(find, replace, 1))
}

/// Insert `payload` as its own line(s) immediately after the line containing
/// the first occurrence of `target`.
#[must_use]
pub fn insert_after_line(haystack: &str, target: &str, payload: &str) -> Option<String> {
    if target.is_empty() {
        return None;
    }
    let at = haystack.find(target)?;
    let rest = &haystack[at + target.len()..];
    let line_end = match rest.find('\n') {
        Some(i) => at + target.len() + i + 1,
        None => haystack.len(),
    };
    let mut out = String::with_capacity(haystack.len() + payload.len() + 2);
    out.push_str(&haystack[..line_end]);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(payload);
    if !payload.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&haystack[line_end..]);
    Some(out)
}

/// Insert `payload` as its own line(s) immediately before the line containing
/// the first occurrence of `target`.
#[must_use]
pub fn insert_before_line(haystack: &str, target: &str, payload: &str) -> Option<String> {
    if target.is_empty() {
        return None;
    }
    let at = haystack.find(target)?;
    let line_start = match haystack[..at].rfind('\n') {
        Some(i) => i + 1,
        None => 0,
    };
    let mut out = String::with_capacity(haystack.len() + payload.len() + 2);
    out.push_str(&haystack[..line_start]);
    out.push_str(payload);
    if !payload.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&haystack[line_start..]);
    Some(out)
}
