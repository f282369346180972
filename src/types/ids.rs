//! Deterministic UUIDv5 identifiers for plans and steps.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that
//! `plan_id` and `step_id` are reproducible across runs for the same
//! serialized step sequence.
use std::fmt::Write;
use uuid::Uuid;

use super::plan::Plan;
use super::step::Step;
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Serialize a step into a stable, human-readable string used for UUIDv5
/// input. Alternatives are folded in so two steps differing only in their
/// fallback chain get distinct IDs.
fn serialize_step(s: &Step) -> String {
    let mut out = format!("{}:{}", s.action.as_str(), s.path.to_string_lossy());
    if let Some(f) = &s.find {
        let _ = write!(out, "|f={f}");
    }
    if let Some(r) = &s.replace {
        let _ = write!(out, "|r={r}");
    }
    if let Some(t) = &s.target {
        let _ = write!(out, "|t={t}");
    }
    if let Some(c) = &s.content {
        let _ = write!(out, "|c={c}");
    }
    match &s.alternative {
        None => {}
        Some(crate::types::step::Alternative::One(alt)) => {
            let _ = write!(out, "|alt[{}]", serialize_step(alt));
        }
        Some(crate::types::step::Alternative::Many(seq)) => {
            for alt in seq {
                let _ = write!(out, "|alt[{}]", serialize_step(alt));
            }
        }
    }
    out
}

/// Compute a deterministic UUIDv5 for a plan by serializing steps in order.
///
/// Two plans with identical step sequences (including ordering) will have the
/// same `plan_id`, independent of the root directory they are applied to.
#[must_use]
pub fn plan_id(plan: &Plan) -> Uuid {
    let ns = namespace();
    let mut s = String::new();
    for step in &plan.steps {
        s.push_str(&serialize_step(step));
        s.push('\n');
    }
    Uuid::new_v5(&ns, s.as_bytes())
}

/// Compute a deterministic UUIDv5 for a step as a function of the plan ID and
/// the step's serialized form, including the stable position index.
#[must_use]
pub fn step_id(plan_id: &Uuid, step: &Step, idx: usize) -> Uuid {
    let mut s = serialize_step(step);
    let _ = write!(s, "#{idx}");
    Uuid::new_v5(plan_id, s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::step::ActionKind;

    #[test]
    fn plan_id_is_stable_across_calls() {
        let plan = Plan {
            steps: vec![Step::new(ActionKind::CreateFolder, "src/pages")],
        };
        assert_eq!(plan_id(&plan), plan_id(&plan));
    }

    #[test]
    fn plan_id_distinguishes_order() {
        let a = Step::new(ActionKind::CreateFolder, "a");
        let b = Step::new(ActionKind::CreateFolder, "b");
        let p1 = Plan { steps: vec![a.clone(), b.clone()] };
        let p2 = Plan { steps: vec![b, a] };
        assert_ne!(plan_id(&p1), plan_id(&p2));
    }

    #[test]
    fn step_id_distinguishes_alternative_chain() {
        let plain = Step::new(ActionKind::CreateFile, "x.js").with_content("x");
        let with_alt = plain
            .clone()
            .with_alternative(Step::new(ActionKind::AppendFile, "x.js").with_content("x"));
        let pid = plan_id(&Plan { steps: vec![plain.clone()] });
        assert_ne!(step_id(&pid, &plain, 0), step_id(&pid, &with_alt, 0));
    }
}
