//! Run configurations (`runConfigurations`) and their built-in kinds.

use idex_core::{MapConvertible, ProjectScope, SettingsMap, to_settings_map};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::container::{PolymorphicContainer, PolymorphicEntry};

/// Map of an entry with its kind tag first.
pub(crate) fn tagged_map<T: Serialize>(kind: &str, entry: &T) -> SettingsMap {
    let mut map = SettingsMap::new();
    map.insert("type".to_string(), Value::String(kind.to_string()));
    map.extend(to_settings_map(entry));
    map
}

macro_rules! run_configuration_kind {
    ($ty:ident, $kind:literal) => {
        impl MapConvertible for $ty {
            fn to_map(&self) -> SettingsMap {
                tagged_map($kind, self)
            }
        }

        impl PolymorphicEntry for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn kind(&self) -> &'static str {
                $kind
            }
        }
    };
}

/// Launches a main class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    pub defaults: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub envs: IndexMap<String, String>,
}

/// Runs JUnit tests selected by class, package, pattern or method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct JUnit {
    pub name: String,
    pub defaults: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub envs: IndexMap<String, String>,
}

/// Runs host build tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Gradle {
    pub name: String,
    pub defaults: bool,
    /// Directory of the project the tasks run in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_parameters: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub envs: IndexMap<String, String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteMode {
    #[default]
    Attach,
    Listen,
}

/// Attaches a debugger to a remote JVM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Remote {
    pub name: String,
    pub defaults: bool,
    pub mode: RemoteMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_memory_address: Option<String>,
}

run_configuration_kind!(Application, "application");
run_configuration_kind!(JUnit, "junit");
run_configuration_kind!(Gradle, "gradle");
run_configuration_kind!(Remote, "remote");

impl Application {
    fn create(name: &str, _scope: &ProjectScope) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl JUnit {
    fn create(name: &str, _scope: &ProjectScope) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Gradle {
    /// New Gradle configurations run in the owning project's directory.
    fn create(name: &str, scope: &ProjectScope) -> Self {
        Self {
            name: name.to_string(),
            project_path: Some(idex_core::types::normalize_separators(scope.project_dir())),
            ..Default::default()
        }
    }
}

impl Remote {
    fn create(name: &str, _scope: &ProjectScope) -> Self {
        Self {
            name: name.to_string(),
            host: Some("localhost".to_string()),
            port: Some(5005),
            ..Default::default()
        }
    }
}

/// Run configuration container with the built-in kinds registered.
pub fn run_configuration_container(scope: &ProjectScope) -> PolymorphicContainer {
    let mut container = PolymorphicContainer::new("runConfigurations", scope.clone());
    container
        .register("application", Application::create)
        .register("junit", JUnit::create)
        .register("gradle", Gradle::create)
        .register("remote", Remote::create);
    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope() -> ProjectScope {
        ProjectScope::root("demo", "/work/demo")
    }

    #[test]
    fn test_builtin_kinds_registered() {
        let container = run_configuration_container(&scope());
        let kinds: Vec<_> = container.kinds().collect();
        assert_eq!(kinds, vec!["application", "junit", "gradle", "remote"]);
    }

    #[test]
    fn test_application_map_is_tagged() {
        let mut container = run_configuration_container(&scope());
        let app = container.create::<Application>("Main").unwrap();
        app.main_class = Some("demo.Main".into());
        app.envs.insert("MODE".into(), "dev".into());

        assert_eq!(
            serde_json::Value::Array(container.to_values()),
            json!([{
                "type": "application",
                "name": "Main",
                "defaults": false,
                "mainClass": "demo.Main",
                "envs": { "MODE": "dev" }
            }])
        );
    }

    #[test]
    fn test_gradle_defaults_to_project_dir() {
        let mut container = run_configuration_container(&scope().child("app"));
        let gradle = container.create::<Gradle>("Build app").unwrap();
        gradle.task_names = vec!["build".into()];
        let map = gradle.to_map();
        assert_eq!(map["projectPath"], json!("/work/demo/app"));
        assert_eq!(map["taskNames"], json!(["build"]));
    }

    #[test]
    fn test_remote_defaults() {
        let mut container = run_configuration_container(&scope());
        let remote = container.create::<Remote>("Debug").unwrap();
        assert_eq!(remote.port, Some(5005));
        assert_eq!(remote.to_map()["mode"], json!("ATTACH"));
    }
}
