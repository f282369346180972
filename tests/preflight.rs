//! Preflight: non-mutating assessment with stops for unknown actions and
//! escaping paths, warnings for skips and fallbacks.

use std::fs;
use std::path::PathBuf;

use patchplan::logging::NullSink;
use patchplan::policy::Policy;
use patchplan::types::{ActionKind, PlanInput, Step};
use patchplan::Patchplan;

fn api() -> Patchplan<NullSink, NullSink> {
    Patchplan::new(NullSink, NullSink, Policy::default())
}

#[test]
fn clean_plan_preflights_ok() {
    let td = tempfile::tempdir().unwrap();
    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::CreateFolder, "src"),
            Step::new(ActionKind::CreateFile, "src/a.js").with_content("x"),
        ],
    });
    let report = api.preflight(&plan, td.path()).unwrap();
    assert!(report.ok);
    assert!(report.stops.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn unknown_action_is_a_stop() {
    let td = tempfile::tempdir().unwrap();
    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::Unknown, "x")],
    });
    let report = api.preflight(&plan, td.path()).unwrap();
    assert!(!report.ok);
    assert_eq!(report.stops.len(), 1);
    assert!(report.stops[0].contains("unknown action"));
}

#[test]
fn escaping_path_is_a_stop() {
    let td = tempfile::tempdir().unwrap();
    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::CreateFile, PathBuf::from("../outside.txt")).with_content("x")
        ],
    });
    let report = api.preflight(&plan, td.path()).unwrap();
    assert!(!report.ok);
    assert!(report.stops[0].contains("path rejected"));
}

#[test]
fn precondition_misses_are_warnings_not_stops() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("exists.js"), "no anchors here").unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![
            // would skip: file exists, no alternative
            Step::new(ActionKind::CreateFile, "exists.js").with_content("x"),
            // would fall back: anchor missing, alternative present
            Step::new(ActionKind::InsertAfter, "exists.js")
                .with_target("<Router>")
                .with_content("y")
                .with_alternative(
                    Step::new(ActionKind::AppendFile, "exists.js").with_content("y"),
                ),
        ],
    });
    let report = api.preflight(&plan, root).unwrap();
    assert!(report.ok);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings[0].contains("will skip"));
    assert!(report.warnings[1].contains("will fall back"));
    // Non-mutating: the file is untouched.
    assert_eq!(
        fs::read_to_string(root.join("exists.js")).unwrap(),
        "no anchors here"
    );
}
