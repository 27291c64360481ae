//! Project-level settings facade.

use idex_core::{HostVersion, MapConvertible, ProjectScope, SettingsError, SettingsMap};
use serde_json::Value;

use crate::artifacts::{ArtifactContainer, artifact_container};
use crate::code_style::CodeStyleConfig;
use crate::compiler::{CompilerConfig, GroovyCompilerConfig};
use crate::container::{NamedContainer, PolymorphicContainer};
use crate::copyright::CopyrightConfig;
use crate::delegation::ActionDelegationConfig;
use crate::encodings::EncodingConfig;
use crate::extensible::{ExtensibleSettings, SettingsDocument, materialize};
use crate::extension::ExtensionRegistry;
use crate::inspections::{Inspection, inspection_container};
use crate::run_config::run_configuration_container;
use crate::triggers::TaskTriggers;

/// Settings attached to the top-level project.
///
/// Built-in sections are created on first access and appear in the
/// rendered document only once they exist.
#[derive(Debug)]
pub struct ProjectSettings {
    base: ExtensibleSettings,
    scope: ProjectScope,
    compiler: Option<CompilerConfig>,
    groovy_compiler: Option<GroovyCompilerConfig>,
    code_style: Option<CodeStyleConfig>,
    inspections: Option<NamedContainer<Inspection>>,
    copyright: Option<CopyrightConfig>,
    encodings: Option<EncodingConfig>,
    run_configurations: Option<PolymorphicContainer>,
    framework_detection_excludes: Option<Vec<String>>,
    task_triggers: Option<TaskTriggers>,
    action_delegation: Option<ActionDelegationConfig>,
    ide_artifacts: Option<ArtifactContainer>,
}

impl ProjectSettings {
    pub fn new(scope: ProjectScope) -> Self {
        Self::with_host(scope, HostVersion::CURRENT)
    }

    pub fn with_host(scope: ProjectScope, host: HostVersion) -> Self {
        Self {
            base: ExtensibleSettings::new(host),
            scope,
            compiler: None,
            groovy_compiler: None,
            code_style: None,
            inspections: None,
            copyright: None,
            encodings: None,
            run_configurations: None,
            framework_detection_excludes: None,
            task_triggers: None,
            action_delegation: None,
            ide_artifacts: None,
        }
    }

    pub fn scope(&self) -> &ProjectScope {
        &self.scope
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        self.base.extensions()
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        self.base.extensions_mut()
    }

    pub fn compiler(&mut self) -> &mut CompilerConfig {
        materialize(&mut self.compiler, "compiler", CompilerConfig::default)
    }

    pub fn configure_compiler(&mut self, configure: impl FnOnce(&mut CompilerConfig)) -> &mut Self {
        configure(self.compiler());
        self
    }

    pub fn groovy_compiler(&mut self) -> &mut GroovyCompilerConfig {
        materialize(
            &mut self.groovy_compiler,
            "groovyCompiler",
            GroovyCompilerConfig::default,
        )
    }

    pub fn configure_groovy_compiler(
        &mut self,
        configure: impl FnOnce(&mut GroovyCompilerConfig),
    ) -> &mut Self {
        configure(self.groovy_compiler());
        self
    }

    pub fn code_style(&mut self) -> &mut CodeStyleConfig {
        materialize(&mut self.code_style, "codeStyle", CodeStyleConfig::default)
    }

    pub fn configure_code_style(&mut self, configure: impl FnOnce(&mut CodeStyleConfig)) -> &mut Self {
        configure(self.code_style());
        self
    }

    pub fn inspections(&mut self) -> &mut NamedContainer<Inspection> {
        materialize(&mut self.inspections, "inspections", inspection_container)
    }

    pub fn configure_inspections(
        &mut self,
        configure: impl FnOnce(&mut NamedContainer<Inspection>),
    ) -> &mut Self {
        configure(self.inspections());
        self
    }

    pub fn copyright(&mut self) -> &mut CopyrightConfig {
        materialize(&mut self.copyright, "copyright", CopyrightConfig::default)
    }

    pub fn configure_copyright(&mut self, configure: impl FnOnce(&mut CopyrightConfig)) -> &mut Self {
        configure(self.copyright());
        self
    }

    pub fn encodings(&mut self) -> &mut EncodingConfig {
        let scope = &self.scope;
        materialize(&mut self.encodings, "encodings", || EncodingConfig::new(scope))
    }

    pub fn configure_encodings(&mut self, configure: impl FnOnce(&mut EncodingConfig)) -> &mut Self {
        configure(self.encodings());
        self
    }

    pub fn run_configurations(&mut self) -> &mut PolymorphicContainer {
        let scope = &self.scope;
        materialize(&mut self.run_configurations, "runConfigurations", || {
            run_configuration_container(scope)
        })
    }

    /// Applies `configure` to the run configurations; entry creation can
    /// fail, so the closure reports errors.
    pub fn configure_run_configurations(
        &mut self,
        configure: impl FnOnce(&mut PolymorphicContainer) -> Result<(), SettingsError>,
    ) -> Result<&mut Self, SettingsError> {
        configure(self.run_configurations())?;
        Ok(self)
    }

    /// Excludes framework ids from detection. Each call adds to the
    /// previously excluded ids.
    pub fn do_not_detect_frameworks<I, S>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        materialize(
            &mut self.framework_detection_excludes,
            "frameworkDetectionExcludes",
            Vec::new,
        )
        .extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn framework_detection_excludes(&self) -> &[String] {
        self.framework_detection_excludes.as_deref().unwrap_or(&[])
    }

    pub fn task_triggers(&mut self) -> &mut TaskTriggers {
        materialize(&mut self.task_triggers, "taskTriggersConfig", TaskTriggers::new)
    }

    pub fn configure_task_triggers(&mut self, configure: impl FnOnce(&mut TaskTriggers)) -> &mut Self {
        configure(self.task_triggers());
        self
    }

    pub fn delegate_actions(&mut self) -> &mut ActionDelegationConfig {
        materialize(
            &mut self.action_delegation,
            "actionDelegationConfig",
            ActionDelegationConfig::default,
        )
    }

    pub fn configure_delegate_actions(
        &mut self,
        configure: impl FnOnce(&mut ActionDelegationConfig),
    ) -> &mut Self {
        configure(self.delegate_actions());
        self
    }

    pub fn ide_artifacts(&mut self) -> &mut ArtifactContainer {
        let scope = &self.scope;
        materialize(&mut self.ide_artifacts, "ideArtifacts", || {
            artifact_container(scope)
        })
    }

    pub fn configure_ide_artifacts(
        &mut self,
        configure: impl FnOnce(&mut ArtifactContainer),
    ) -> &mut Self {
        configure(self.ide_artifacts());
        self
    }
}

pub(crate) fn insert_section<T: MapConvertible>(map: &mut SettingsMap, key: &str, section: Option<&T>) {
    if let Some(section) = section {
        map.insert(key.to_string(), Value::Object(section.to_map()));
    }
}

/// Inserts `values` only when there is at least one; run configurations
/// and facets are omitted while empty.
pub(crate) fn insert_sequence(map: &mut SettingsMap, key: &str, values: Vec<Value>) {
    if !values.is_empty() {
        map.insert(key.to_string(), Value::Array(values));
    }
}

impl SettingsDocument for ProjectSettings {
    fn to_map(&self) -> Result<SettingsMap, SettingsError> {
        let mut map = self.base.collect_extensions()?;

        insert_section(&mut map, "compiler", self.compiler.as_ref());
        insert_section(
            &mut map,
            "groovyCompiler",
            self.groovy_compiler.as_ref(),
        );
        insert_section(&mut map, "codeStyle", self.code_style.as_ref());
        if let Some(inspections) = &self.inspections {
            map.insert("inspections".to_string(), Value::Array(inspections.to_values()));
        }
        insert_section(&mut map, "copyright", self.copyright.as_ref());
        insert_section(&mut map, "encodings", self.encodings.as_ref());
        if let Some(run_configurations) = &self.run_configurations {
            insert_sequence(&mut map, "runConfigurations", run_configurations.to_values());
        }
        if let Some(excludes) = &self.framework_detection_excludes {
            map.insert(
                "frameworkDetectionExcludes".to_string(),
                Value::Array(excludes.iter().cloned().map(Value::String).collect()),
            );
        }
        insert_section(
            &mut map,
            "taskTriggersConfig",
            self.task_triggers.as_ref(),
        );
        insert_section(
            &mut map,
            "actionDelegationConfig",
            self.action_delegation.as_ref(),
        );
        if let Some(artifacts) = &self.ide_artifacts {
            map.insert("ideArtifacts".to_string(), Value::Array(artifacts.to_values()));
        }

        Ok(map)
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
