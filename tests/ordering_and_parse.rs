//! Cross-step ordering guarantees and end-to-end ingestion of model output.

use std::fs;

use patchplan::logging::NullSink;
use patchplan::policy::Policy;
use patchplan::types::{ActionKind, ApplyMode, PlanInput, Step, StepOutcome};
use patchplan::{parse_steps, Patchplan};

fn api() -> Patchplan<NullSink, NullSink> {
    Patchplan::new(NullSink, NullSink, Policy::default())
}

#[test]
fn later_step_sees_earlier_steps_effect_on_same_path() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();

    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::CreateFile, "src/App.js").with_content("<div></div>\n"),
            Step::new(ActionKind::FindAndReplace, "src/App.js")
                .with_find_replace("<div>", "<div><Nav/>"),
        ],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert!(report.ok());
    assert_eq!(
        fs::read_to_string(root.join("src/App.js")).unwrap(),
        "<div><Nav/></div>\n"
    );
}

#[test]
fn steps_run_in_list_order_not_sorted() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();

    // Appends must land in declaration order even though the paths would sort
    // differently.
    let api = api();
    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::AppendFile, "log.txt").with_content("z-first"),
            Step::new(ActionKind::AppendFile, "log.txt").with_content("a-second"),
        ],
    });
    api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(
        fs::read_to_string(root.join("log.txt")).unwrap(),
        "z-first\na-second"
    );
}

#[test]
fn fail_fast_skips_remaining_steps() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();

    let api = Patchplan::new(NullSink, NullSink, Policy::default()).with_fail_fast(true);
    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::Unknown, "x"),
            Step::new(ActionKind::CreateFile, "never.txt").with_content("x"),
        ],
    });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert_eq!(report.steps[0].outcome, StepOutcome::Failed);
    assert_eq!(report.steps[1].outcome, StepOutcome::Skipped);
    assert!(report.steps[1].detail.contains("not attempted"));
    assert!(!root.join("never.txt").exists());
}

#[test]
fn model_output_parses_and_applies_end_to_end() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/App.js"), "function App() {\n  return <div/>;\n}\n").unwrap();

    let raw = r#"Sure! Here is the setup plan:
```json
[
  {"action": "create_folder", "path": "src/pages", "desc": "routing pages"},
  {"action": "create_file", "path": "src/pages/Home.jsx", "content": "<h1>Home</h1>"},
  {"action": "insert_before", "path": "src/App.js", "target": "function App()",
   "content": "import Home from \"./pages/Home\";"}
]
```
Let me know if you need anything else."#;

    let steps = parse_steps(raw).unwrap();
    let api = api();
    let plan = api.plan(PlanInput { steps });
    let report = api.apply(&plan, root, ApplyMode::Commit).unwrap();

    assert!(report.ok());
    assert_eq!(report.applied(), 3);
    assert_eq!(
        fs::read_to_string(root.join("src/App.js")).unwrap(),
        "import Home from \"./pages/Home\";\nfunction App() {\n  return <div/>;\n}\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("src/pages/Home.jsx")).unwrap(),
        "<h1>Home</h1>"
    );
}
