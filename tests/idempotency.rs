//! Idempotency and no-op guarantees: re-applied plans must never double-write
//! or disturb content they did not match.

use std::fs;

use patchplan::logging::NullSink;
use patchplan::policy::Policy;
use patchplan::types::{ActionKind, ApplyMode, PlanInput, Step, StepOutcome};
use patchplan::Patchplan;

fn api() -> Patchplan<NullSink, NullSink> {
    Patchplan::new(NullSink, NullSink, Policy::default())
}

#[test]
fn create_file_twice_skips_second_run_and_keeps_content() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::CreateFile, "src/firebase.js").with_content("X")],
    });

    let first = api.apply(&plan, root, ApplyMode::Commit).unwrap();
    assert_eq!(first.steps[0].outcome, StepOutcome::Applied);

    let second = api.apply(&plan, root, ApplyMode::Commit).unwrap();
    assert_eq!(second.steps[0].outcome, StepOutcome::Skipped);
    assert_eq!(
        fs::read_to_string(root.join("src/firebase.js")).unwrap(),
        "X"
    );
}

#[test]
fn create_file_never_overwrites_differing_content() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("app.js"), "hand-edited").unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::CreateFile, "app.js").with_content("generated")],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(report.steps[0].outcome, StepOutcome::Skipped);
    assert_eq!(fs::read_to_string(root.join("app.js")).unwrap(), "hand-edited");
}

#[test]
fn find_and_replace_without_match_leaves_file_byte_identical() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    let before = "function App() {\n  return <main/>;\n}\n";
    fs::write(root.join("src.js"), before).unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::FindAndReplace, "src.js")
            .with_find_replace("<div>", "<div><Nav/>")],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(report.steps[0].outcome, StepOutcome::Skipped);
    assert_eq!(fs::read_to_string(root.join("src.js")).unwrap(), before);
}

#[test]
fn find_and_replace_touches_only_first_occurrence() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("App.js"), "<div>\n  <span/>\n</div>\n").unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::FindAndReplace, "App.js")
            .with_find_replace("<div>", "<div><Nav/>")],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(report.steps[0].outcome, StepOutcome::Applied);
    let after = fs::read_to_string(root.join("App.js")).unwrap();
    assert_eq!(after, "<div><Nav/>\n  <span/>\n</div>\n");
    assert_eq!(after.matches("<Nav/>").count(), 1);
}

#[test]
fn insert_after_without_target_and_without_alternative_skips() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    let before = "export default function Layout() {\n  return null;\n}\n";
    fs::write(root.join("layout.jsx"), before).unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::InsertAfter, "layout.jsx")
            .with_target("{children}")
            .with_content("<Providers>{children}</Providers>")],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(report.steps[0].outcome, StepOutcome::Skipped);
    assert_eq!(fs::read_to_string(root.join("layout.jsx")).unwrap(), before);
}

#[test]
fn insert_after_adds_exactly_one_occurrence() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::write(
        root.join("main.jsx"),
        "root.render(\n  <App/>\n);\n",
    )
    .unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::InsertAfter, "main.jsx")
            .with_target("root.render(")
            .with_content("  // mounted by scaffolder")],
    });
    api.apply(&plan, root, ApplyMode::Commit).unwrap();

    let after = fs::read_to_string(root.join("main.jsx")).unwrap();
    assert_eq!(after.matches("// mounted by scaffolder").count(), 1);
    assert_eq!(
        after,
        "root.render(\n  // mounted by scaffolder\n  <App/>\n);\n"
    );
}

#[test]
fn delete_twice_in_one_plan_is_not_an_error() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("tmp.txt"), "x").unwrap();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::Delete, "tmp.txt"),
            Step::new(ActionKind::Delete, "tmp.txt"),
        ],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(report.applied(), 2);
    assert_eq!(report.failed(), 0);
}
