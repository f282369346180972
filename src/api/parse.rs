//! Tolerant ingestion of model-produced step lists.
//!
//! Upstream producers wrap the JSON array in Markdown code fences or prose
//! more often than not. `parse_steps` strips that down to the first JSON
//! array and deserializes it; strictly-formed input passes through serde
//! untouched.

use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::step::Step;

/// Parse a JSON array of steps, tolerating Markdown fences and surrounding
/// prose. Unknown `action` values survive as `ActionKind::Unknown` and fail
/// per-step at apply time rather than failing the parse.
pub fn parse_steps(raw: &str) -> Result<Vec<Step>> {
    let json = extract_json_array(raw).ok_or_else(|| Error {
        kind: ErrorKind::Parse,
        msg: "no JSON array found in input".into(),
    })?;
    serde_json::from_str(json).map_err(|e| Error {
        kind: ErrorKind::Parse,
        msg: format!("step list is not valid JSON: {e}"),
    })
}

/// Locate the outermost JSON array in free-form text. Bracket matching is
/// string-aware so brackets inside step content do not end the scan early.
fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
