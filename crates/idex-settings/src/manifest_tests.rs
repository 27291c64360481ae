use super::*;
use crate::extensible::SettingsDocument;
use crate::run_config::{Application, Remote};
use serde_json::{Value, json};
use tempfile::TempDir;

const FULL_MANIFEST: &str = r#"
[project]
name = "demo"
dir = "."

[settings]
do_not_detect_frameworks = ["android", "web"]
compiler = { processHeapSize = 2048, parallelCompilation = true }
delegate_actions = { delegateBuildRunToGradle = true, testRunner = "CHOOSE_PER_TEST" }
task_triggers = { beforeSync = [":generate"], afterBuild = [":lib:report", ":app:check"] }
inspections = [{ name = "unused", enabled = false }]
run_configurations = [
    { kind = "Application", name = "Main", mainClass = "demo.Main" },
    { kind = "remote", name = "Debug", port = 9009 },
]
extensions = { buildInfo = { version = "1.0" } }

[modules.app]
dir = "application"
package_prefix = { "src/main/java" = "com.example.app" }
facets = [{ kind = "spring", name = "spring", contexts = [{ name = "main", file = ["app.xml"] }] }]
"#;

fn document(settings: &impl SettingsDocument) -> Value {
    Value::Object(settings.to_map().unwrap())
}

#[test]
fn test_parse_full_manifest() {
    let manifest = Manifest::parse(FULL_MANIFEST, Path::new("/work/demo")).unwrap();
    let project = document(manifest.project());

    assert_eq!(project["buildInfo"], json!({ "version": "1.0" }));
    assert_eq!(project["frameworkDetectionExcludes"], json!(["android", "web"]));
    assert_eq!(project["compiler"]["processHeapSize"], json!(2048));
    assert_eq!(project["compiler"]["parallelCompilation"], json!(true));
    assert_eq!(
        project["actionDelegationConfig"],
        json!({ "delegateBuildRunToGradle": true, "testRunner": "CHOOSE_PER_TEST" })
    );
    assert_eq!(project["inspections"], json!([{ "name": "unused", "enabled": false }]));
    assert_eq!(
        project["taskTriggersConfig"],
        json!({
            "beforeSync": [{ "taskPath": ":generate", "projectPath": "/work/demo" }],
            "afterBuild": [
                { "taskPath": ":lib:report", "projectPath": "/work/demo" },
                { "taskPath": ":app:check", "projectPath": "/work/demo" }
            ]
        })
    );
}

#[test]
fn test_run_configurations_built_by_kind_tag() {
    let manifest = Manifest::parse(FULL_MANIFEST, Path::new("/work/demo")).unwrap();
    let mut manifest = manifest;
    let runs = manifest.project_mut().run_configurations();

    let main = runs.get_as::<Application>("Main").unwrap();
    assert_eq!(main.main_class.as_deref(), Some("demo.Main"));

    let debug = runs.get_as::<Remote>("Debug").unwrap();
    assert_eq!(debug.port, Some(9009));
    assert_eq!(debug.host.as_deref(), Some("localhost"));
}

#[test]
fn test_module_uses_explicit_dir() {
    let manifest = Manifest::parse(FULL_MANIFEST, Path::new("/work/demo")).unwrap();
    assert_eq!(manifest.module_names().collect::<Vec<_>>(), vec!["app"]);

    let app = manifest.module("app").unwrap();
    assert_eq!(app.scope().path(), ":app");
    assert_eq!(
        document(app),
        json!({
            "facets": [{
                "type": "spring",
                "name": "spring",
                "contexts": [{ "name": "main", "file": ["app.xml"] }]
            }],
            "packagePrefix": { "/work/demo/application/src/main/java": "com.example.app" }
        })
    );
}

#[test]
fn test_task_of_declared_module_uses_module_scope() {
    let manifest = Manifest::parse(FULL_MANIFEST, Path::new("/work/demo")).unwrap();
    let mut manifest = manifest;
    let triggers = manifest.project_mut().task_triggers();
    let check = &triggers.tasks(Phase::AfterBuild)[1];
    assert_eq!(check.project().project_dir(), Path::new("/work/demo/application"));

    let report = &triggers.tasks(Phase::AfterBuild)[0];
    assert_eq!(report.project().path(), ":lib");
}

#[test]
fn test_minimal_manifest_renders_empty_document() {
    let manifest = Manifest::parse("[project]\nname = \"empty\"\n", Path::new("/work")).unwrap();
    assert_eq!(manifest.project().render().unwrap(), "{}");
    assert_eq!(manifest.project().scope().project_dir(), Path::new("/work"));
    assert_eq!(manifest.module_names().count(), 0);
}

#[test]
fn test_encodings_mapping_resolved_against_project() {
    let manifest = Manifest::parse(
        r#"
[project]
name = "demo"

[settings.encodings]
encoding = "UTF-8"
bomPolicy = "WITH_NO_BOM"
mapping = { "src/legacy" = "windows-1252" }
"#,
        Path::new("/work/demo"),
    )
    .unwrap();
    let project = document(manifest.project());
    assert_eq!(project["encodings"]["encoding"], json!("UTF-8"));
    assert_eq!(project["encodings"]["bomPolicy"], json!("WITH_NO_BOM"));
    assert_eq!(
        project["encodings"]["mapping"],
        json!({ "/work/demo/src/legacy": "windows-1252" })
    );
}

#[test]
fn test_unknown_run_configuration_kind_rejected() {
    let err = Manifest::parse(
        r#"
[project]
name = "demo"

[settings]
run_configurations = [{ kind = "cargo", name = "Build" }]
"#,
        Path::new("/work/demo"),
    )
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid run configuration 'Build'"), "{message}");
    assert!(message.contains("kind 'cargo'"), "{message}");
}

#[test]
fn test_duplicate_inspection_rejected() {
    let err = Manifest::parse(
        r#"
[project]
name = "demo"

[settings]
inspections = [{ name = "unused" }, { name = "unused", enabled = false }]
"#,
        Path::new("/work/demo"),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("'unused' is already registered in inspections"));
}

#[test]
fn test_bad_task_paths_rejected() {
    for path in ["generate", ":", ":lib:"] {
        let text = format!(
            "[project]\nname = \"demo\"\n\n[settings]\ntask_triggers = {{ beforeSync = [\"{path}\"] }}\n"
        );
        assert!(
            Manifest::parse(&text, Path::new("/work/demo")).is_err(),
            "accepted task path {path:?}"
        );
    }
}

#[test]
fn test_unknown_phase_rejected() {
    let err = Manifest::parse(
        "[project]\nname = \"demo\"\n\n[settings]\ntask_triggers = { duringBuild = [\":x\"] }\n",
        Path::new("/work/demo"),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("Unknown lifecycle phase 'duringBuild'"));
}

#[test]
fn test_unknown_settings_key_rejected() {
    let result = Manifest::parse(
        "[project]\nname = \"demo\"\n\n[settings]\ncompilr = {}\n",
        Path::new("/work/demo"),
    );
    assert!(result.is_err());
}

#[test]
fn test_misspelled_section_key_rejected() {
    let err = Manifest::parse(
        "[project]\nname = \"demo\"\n\n[settings]\ncompiler = { procesHeapSize = 2048 }\n",
        Path::new("/work/demo"),
    )
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid [settings.compiler]"), "{message}");
    assert!(message.contains("procesHeapSize"), "{message}");
}

#[test]
fn test_misspelled_run_configuration_field_rejected() {
    let err = Manifest::parse(
        r#"
[project]
name = "demo"

[settings]
run_configurations = [{ kind = "remote", name = "Debug", prot = 9009 }]
"#,
        Path::new("/work/demo"),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("Invalid run configuration 'Debug'"));
}

#[test]
fn test_parent_dir_segments_are_collapsed() {
    let manifest = Manifest::parse(
        r#"
[project]
name = "demo"

[modules.shared]
dir = "../shared"
package_prefix = { "src" = "demo.shared" }
"#,
        Path::new("/work/demo"),
    )
    .unwrap();
    let shared = manifest.module("shared").unwrap();
    assert_eq!(shared.scope().project_dir(), Path::new("/work/shared"));
    assert_eq!(
        document(shared)["packagePrefix"],
        json!({ "/work/shared/src": "demo.shared" })
    );
}

#[test]
fn test_normalize_dir_keeps_leading_parent_of_relative_path() {
    assert_eq!(normalize_dir(Path::new("a/./b/../c")), PathBuf::from("a/c"));
    assert_eq!(normalize_dir(Path::new("../x")), PathBuf::from("../x"));
    assert_eq!(normalize_dir(Path::new("/../x")), PathBuf::from("/x"));
}

#[test]
fn test_old_host_fails_at_render_time() {
    let manifest = Manifest::parse(
        "[project]\nname = \"demo\"\nhost_version = \"3.1\"\n\n[settings]\nextensions = { info = { a = 1 } }\n",
        Path::new("/work/demo"),
    )
    .unwrap();
    let err = manifest.project().render().unwrap_err();
    assert!(err.to_string().contains("upgrade the host to 3.5 or newer"));
}

#[test]
fn test_load_resolves_dirs_against_manifest_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(MANIFEST_FILE);
    std::fs::write(
        &path,
        "[project]\nname = \"demo\"\n\n[modules.core]\npackage_prefix = { src = \"demo.core\" }\n",
    )
    .unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.path(), path.as_path());
    assert_eq!(manifest.project().scope().project_dir(), dir.path());

    let core = manifest.module("core").unwrap();
    assert_eq!(core.scope().project_dir(), dir.path().join("core"));
}

#[test]
fn test_load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(MANIFEST_FILE);
    let err = Manifest::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read manifest"));
}
