//! Apply stage: executes plan steps in order with alternative fallback.
//!
//! Side-effects:
//! - Emits facts for `apply.attempt`, one `step.result` per step, and a final
//!   `apply.result` summary with outcome counts and inferred error IDs.
//! - Logs a human-readable audit line per step.
//! - Never aborts the plan on a failed step unless `policy.fail_fast` is set;
//!   in that case the remaining steps are reported `skipped` unattempted.

use std::path::Path;
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::api::errors::infer_summary_error_ids;
use crate::api::Patchplan;
use crate::constants::CONTENT_PREVIEW_MAX;
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::types::ids::{plan_id, step_id};
use crate::types::{ApplyMode, ExecutionReport, Plan, Step, StepOutcome, StepReport};

mod handlers;
pub(crate) use handlers::{eval_primary, Eval};

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &Patchplan<E, A>,
    plan: &Plan,
    root: &Path,
    mode: ApplyMode,
) -> ExecutionReport {
    let t0 = Instant::now();
    let dry = matches!(mode, ApplyMode::DryRun);
    let pid = plan_id(plan);
    let ts_now = ts_for_mode(&mode);

    let tctx = AuditCtx::new(
        &api.facts,
        pid.to_string(),
        ts_now,
        AuditMode {
            dry_run: dry,
            redact: dry,
        },
    );
    let slog = StageLogger::new(&tctx);

    api.audit.log(Level::Info, "apply: starting");
    slog.apply_attempt()
        .merge(json!({
            "steps": plan.steps.len(),
            "root": root.display().to_string(),
        }))
        .emit_success();

    let mut rows: Vec<StepReport> = Vec::with_capacity(plan.steps.len());
    let mut halted = false;

    for (idx, step) in plan.steps.iter().enumerate() {
        let sid = step_id(&pid, step, idx).to_string();
        let (outcome, detail) = if halted {
            (
                StepOutcome::Skipped,
                "not attempted: earlier step failed with fail_fast".to_string(),
            )
        } else {
            handlers::run_step(&api.policy, root, step, dry)
        };

        let level = match outcome {
            StepOutcome::Failed => Level::Warn,
            _ => Level::Info,
        };
        api.audit.log(
            level,
            &format!(
                "{} {} -> {}: {detail}",
                step.action.as_str(),
                step.path.display(),
                outcome.as_str()
            ),
        );

        let ev = slog
            .step_result()
            .step(sid)
            .path(step.path.display().to_string())
            .merge(json!({
                "action": step.action.as_str(),
                "outcome": outcome.as_str(),
                "detail": detail,
                "content_preview": preview(step),
            }));
        match outcome {
            StepOutcome::Failed => ev.emit_failure(),
            StepOutcome::Skipped => ev.emit_warn(),
            _ => ev.emit_success(),
        }

        if outcome == StepOutcome::Failed && api.policy.fail_fast {
            halted = true;
        }
        rows.push(StepReport {
            action: step.action.clone(),
            path: step.path.display().to_string(),
            outcome,
            detail,
        });
    }

    let duration_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);
    let failed_details: Vec<String> = rows
        .iter()
        .filter(|r| r.outcome == StepOutcome::Failed)
        .map(|r| r.detail.clone())
        .collect();
    let decision = if failed_details.is_empty() {
        "success"
    } else {
        "failure"
    };

    let mut summary = slog.apply_result().merge(json!({
        "applied": rows.iter().filter(|r| r.outcome == StepOutcome::Applied).count(),
        "skipped": rows.iter().filter(|r| r.outcome == StepOutcome::Skipped).count(),
        "fell_back": rows.iter().filter(|r| r.outcome == StepOutcome::FellBack).count(),
        "failed": failed_details.len(),
        "duration_ms": duration_ms,
    }));
    if !failed_details.is_empty() {
        summary = summary.merge(json!({
            "errors": failed_details,
            "error_ids": infer_summary_error_ids(&failed_details),
        }));
    }
    match decision {
        "success" => summary.emit_success(),
        _ => summary.emit_failure(),
    }
    api.audit.log(Level::Info, "apply: finished");

    ExecutionReport {
        steps: rows,
        duration_ms,
        plan_uuid: Some(pid),
    }
}

/// Short payload echo for facts; full content never enters the audit stream.
fn preview(step: &Step) -> Option<String> {
    step.content.as_ref().map(|c| {
        if c.len() <= CONTENT_PREVIEW_MAX {
            c.clone()
        } else {
            let mut cut = CONTENT_PREVIEW_MAX;
            while !c.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}…", &c[..cut])
        }
    })
}
