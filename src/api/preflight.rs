//! Preflight stage: non-mutating assessment of a plan against the tree.
//!
//! Side-effects:
//! - Emits one preflight fact per step with the expected outcome, plus a
//!   summary fact.
//! - Returns a `PreflightReport`: unknown actions and root-escaping paths are
//!   stops; steps that would skip or fall back are warnings.

use std::path::Path;

use serde_json::json;

use crate::api::apply::{eval_primary, Eval};
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{FactsEmitter, StageLogger, TS_ZERO};
use crate::types::ids::{plan_id, step_id};
use crate::types::{ActionKind, Plan, PreflightReport};

pub(crate) fn run<E: FactsEmitter, A: crate::logging::AuditSink>(
    api: &super::Patchplan<E, A>,
    plan: &Plan,
    root: &Path,
) -> PreflightReport {
    let mut warnings: Vec<String> = Vec::new();
    let mut stops: Vec<String> = Vec::new();

    let pid = plan_id(plan);
    let ctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        pid.to_string(),
        TS_ZERO.to_string(),
        AuditMode {
            dry_run: true,
            redact: true,
        },
    );
    let slog = StageLogger::new(&ctx);

    for (idx, step) in plan.steps.iter().enumerate() {
        let sid = step_id(&pid, step, idx).to_string();
        let path = step.path.display().to_string();

        let (expected, note): (&str, Option<String>) = if step.action == ActionKind::Unknown {
            let msg = format!("step {idx}: unknown action for {path}");
            stops.push(msg.clone());
            ("failed", Some(msg))
        } else {
            match eval_primary(root, step, true) {
                Eval::Applied(d) => ("applied", Some(d)),
                Eval::Failed(e) => {
                    let msg = format!("step {idx}: {e}");
                    stops.push(msg.clone());
                    ("failed", Some(msg))
                }
                Eval::NotApplicable(reason) => {
                    if step.alternative.is_some() {
                        let msg = format!("step {idx}: will fall back ({reason})");
                        warnings.push(msg.clone());
                        ("fell_back", Some(msg))
                    } else {
                        let msg = format!("step {idx}: will skip ({reason})");
                        warnings.push(msg.clone());
                        ("skipped", Some(msg))
                    }
                }
            }
        };

        let ev = slog
            .preflight()
            .step(sid)
            .path(path)
            .merge(json!({
                "action": step.action.as_str(),
                "expected": expected,
                "note": note,
            }));
        match expected {
            "failed" => ev.emit_failure(),
            "applied" => ev.emit_success(),
            _ => ev.emit_warn(),
        }
    }

    let ok = stops.is_empty();
    let ev = slog.preflight_summary().merge(json!({
        "steps": plan.steps.len(),
        "warnings": warnings.len(),
        "stops": stops.len(),
    }));
    if ok {
        ev.emit_success();
    } else {
        ev.emit_failure();
    }

    PreflightReport {
        ok,
        warnings,
        stops,
    }
}
