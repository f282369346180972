use log::Level;
use serde_json::Value;

/// Structured fact stream: one JSON event per plan/preflight/apply stage row.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Human-readable audit line sink, one message per notable action.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Discarding sink; stands in wherever a caller does not care about facts or
/// audit lines (tests, library embedding).
#[derive(Default)]
pub struct NullSink;

impl FactsEmitter for NullSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for NullSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
