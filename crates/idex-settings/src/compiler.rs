//! Compiler sections: project-wide build settings and the Groovy compiler.

use idex_core::{MapConvertible, SettingsMap, to_settings_map};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Project compiler settings (`compiler`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CompilerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_patterns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_heap_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_show_first_error_in_editor: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_notification_popup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_output_directory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_not_null_assertions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_automake: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_compilation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuild_module_on_dependency_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_release_option: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javac: Option<JavacConfig>,
}

impl CompilerConfig {
    /// Lazily created javac sub-section.
    pub fn javac(&mut self) -> &mut JavacConfig {
        self.javac.get_or_insert_with(JavacConfig::default)
    }
}

impl MapConvertible for CompilerConfig {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct JavacConfig {
    #[serde(
        rename = "preferTargetJDKCompiler",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefer_target_jdk_compiler: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javac_additional_options: Option<String>,
    /// Per-module additional options, keyed by module name.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub module_javac_additional_options: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_debug_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_deprecation_warnings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_no_warnings: Option<bool>,
}

/// Groovy compiler settings (`groovyCompiler`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct GroovyCompilerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heap_size: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<GroovyExclude>,
}

impl GroovyCompilerConfig {
    /// Excludes a single file from Groovy compilation.
    pub fn exclude_file(&mut self, url: impl Into<String>) -> &mut Self {
        self.excludes.push(GroovyExclude {
            url: url.into(),
            include_subdirectories: false,
            is_file: true,
        });
        self
    }

    /// Excludes a directory, optionally with everything below it.
    pub fn exclude_dir(&mut self, url: impl Into<String>, recursively: bool) -> &mut Self {
        self.excludes.push(GroovyExclude {
            url: url.into(),
            include_subdirectories: recursively,
            is_file: false,
        });
        self
    }
}

impl MapConvertible for GroovyCompilerConfig {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct GroovyExclude {
    pub url: String,
    pub include_subdirectories: bool,
    pub is_file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_untouched_compiler_is_empty_map() {
        assert!(CompilerConfig::default().to_map().is_empty());
    }

    #[test]
    fn test_compiler_map_uses_camel_case_keys() {
        let mut compiler = CompilerConfig {
            process_heap_size: Some(2048),
            parallel_compilation: Some(true),
            ..Default::default()
        };
        compiler.javac().javac_additional_options = Some("-Xlint".into());
        compiler
            .javac()
            .module_javac_additional_options
            .insert("app".into(), "-parameters".into());

        assert_eq!(
            Value::Object(compiler.to_map()),
            json!({
                "processHeapSize": 2048,
                "parallelCompilation": true,
                "javac": {
                    "javacAdditionalOptions": "-Xlint",
                    "moduleJavacAdditionalOptions": { "app": "-parameters" }
                }
            })
        );
    }

    #[test]
    fn test_groovy_excludes_in_order() {
        let mut groovy = GroovyCompilerConfig::default();
        groovy.heap_size = Some(512);
        groovy
            .exclude_file("src/main/groovy/Legacy.groovy")
            .exclude_dir("src/gen", true);
        let map = groovy.to_map();
        assert_eq!(map["heapSize"], json!(512));
        assert_eq!(
            map["excludes"],
            json!([
                { "url": "src/main/groovy/Legacy.groovy", "includeSubdirectories": false, "isFile": true },
                { "url": "src/gen", "includeSubdirectories": true, "isFile": false }
            ])
        );
    }
}
