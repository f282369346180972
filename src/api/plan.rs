//! api/plan.rs — plan construction.

use crate::logging::FactsEmitter;
use crate::types::ids::{plan_id, step_id};
use crate::types::{Plan, PlanInput};

use crate::logging::audit::{emit_plan_fact, AuditCtx, AuditMode};
use crate::logging::TS_ZERO;

/// Build a plan from input and emit per-step plan facts.
///
/// Step order is preserved verbatim: later steps may depend on earlier steps'
/// filesystem effects, so the executor must never reorder them.
pub(super) fn build<E: FactsEmitter, A: crate::logging::AuditSink>(
    api: &super::Patchplan<E, A>,
    input: PlanInput,
) -> Plan {
    let plan = Plan { steps: input.steps };

    let pid_uuid = plan_id(&plan);
    let pid = pid_uuid.to_string();
    let tctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        pid,
        TS_ZERO.to_string(),
        AuditMode {
            dry_run: true,
            redact: true,
        },
    );
    for (idx, step) in plan.steps.iter().enumerate() {
        let sid = step_id(&pid_uuid, step, idx).to_string();
        emit_plan_fact(
            &tctx,
            &sid,
            step.action.as_str(),
            Some(&step.path.display().to_string()),
        );
    }

    plan
}
