use patchplan::logging::NullSink;
use patchplan::policy::Policy;
use patchplan::types::{ActionKind, ApplyMode, PlanInput, Step};
use patchplan::Patchplan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let facts = NullSink::default();
    let audit = NullSink::default();
    let api = Patchplan::new(facts, audit, Policy::default());

    let td = tempfile::tempdir()?;
    let root = td.path();
    std::fs::write(root.join("App.js"), "function App() {\n  return <div/>;\n}\n")?;

    let plan = api.plan(PlanInput {
        steps: vec![
            Step::new(ActionKind::CreateFolder, "src/pages"),
            Step::new(ActionKind::CreateFile, "src/pages/Home.jsx").with_content("<h1>Home</h1>"),
            Step::new(ActionKind::FindAndReplace, "App.js")
                .with_find_replace("<div/>", "<Home/>"),
        ],
    });

    let report = api.apply(&plan, root, ApplyMode::DryRun)?;
    for row in &report.steps {
        println!("{:10} {} -> {}", row.outcome.as_str(), row.path, row.detail);
    }
    Ok(())
}
