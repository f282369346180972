use patchplan::logging::NullSink;
use patchplan::policy::Policy;
use patchplan::types::{ActionKind, ApplyMode, PlanInput, Step};
use patchplan::Patchplan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api = Patchplan::new(NullSink::default(), NullSink::default(), Policy::default());

    let td = tempfile::tempdir()?;
    let root = td.path();
    std::fs::create_dir_all(root.join("src"))?;
    std::fs::write(root.join("src/firebase.js"), "import app from \"firebase/app\";\n")?;

    // create_file skips existing files; the alternative patches the existing
    // module instead.
    let plan = api.plan(PlanInput {
        steps: vec![Step::new(ActionKind::CreateFile, "src/firebase.js")
            .with_content("// full generated config\n")
            .with_alternative(
                Step::new(ActionKind::InsertAfter, "src/firebase.js")
                    .with_target("firebase/app\";")
                    .with_content("import { getAuth } from \"firebase/auth\";"),
            )],
    });

    let preflight = api.preflight(&plan, root)?;
    println!("preflight ok={} warnings={:?}", preflight.ok, preflight.warnings);

    let report = api.apply(&plan, root, ApplyMode::Commit)?;
    for row in &report.steps {
        println!("{:10} {} -> {}", row.outcome.as_str(), row.path, row.detail);
    }
    println!("{}", std::fs::read_to_string(root.join("src/firebase.js"))?);
    Ok(())
}
