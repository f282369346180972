pub mod audit;
pub mod facts;
pub mod redact;

pub use audit::{Decision, EventBuilder, Stage, StageLogger};
pub use facts::{AuditSink, FactsEmitter, NullSink};
pub use redact::{redact_event, ts_for_mode, TS_ZERO};
