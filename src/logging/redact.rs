use crate::types::plan::ApplyMode;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission based on mode.
/// - DryRun: constant zero timestamp for determinism.
/// - Commit: real, current timestamp in RFC3339.
pub fn ts_for_mode(mode: &ApplyMode) -> String {
    match mode {
        ApplyMode::DryRun => TS_ZERO.to_string(),
        ApplyMode::Commit => now_iso(),
    }
}

/// Apply redactions to a fact event for comparison and deterministic dry-run
/// streams: zero the timestamp and remove volatile timing fields. Payload
/// previews stay; they are already truncated at emission.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("severity");
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redact_zeroes_ts_and_drops_volatile_fields() {
        let input = json!({
            "ts": "2025-01-01T12:00:00Z",
            "duration_ms": 123,
            "severity": "warn",
            "path": "src/App.js",
            "outcome": "applied",
        });
        let out = redact_event(input);
        assert_eq!(out.get("ts").and_then(|v| v.as_str()), Some(TS_ZERO));
        assert!(out.get("duration_ms").is_none());
        assert!(out.get("severity").is_none());
        assert_eq!(out.get("path").and_then(|v| v.as_str()), Some("src/App.js"));
    }

    #[test]
    fn ts_for_mode_is_zero_in_dry_run() {
        assert_eq!(ts_for_mode(&ApplyMode::DryRun), TS_ZERO);
        assert_ne!(ts_for_mode(&ApplyMode::Commit), TS_ZERO);
    }
}
