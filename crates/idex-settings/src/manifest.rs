//! `idex.toml` loading: describes a project, its modules, and the settings
//! to build for each of them.

use anyhow::{Context, Result, bail};
use idex_core::{HostVersion, ProjectScope, SettingsMap, TaskRef};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::container::apply_overlay;
use crate::encodings::{BomPolicy, PropertiesEncoding};
use crate::extension::ExtensionRegistry;
use crate::inspections::Inspection;
use crate::module::ModuleSettings;
use crate::project::ProjectSettings;
use crate::triggers::Phase;

pub const MANIFEST_FILE: &str = "idex.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    project: ProjectSection,
    #[serde(default)]
    settings: SettingsSection,
    #[serde(default)]
    modules: IndexMap<String, ModuleSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectSection {
    name: String,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    host_version: Option<HostVersion>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsSection {
    compiler: Option<SettingsMap>,
    groovy_compiler: Option<SettingsMap>,
    code_style: Option<SettingsMap>,
    copyright: Option<SettingsMap>,
    encodings: Option<EncodingsSection>,
    delegate_actions: Option<SettingsMap>,
    do_not_detect_frameworks: Vec<String>,
    task_triggers: IndexMap<String, Vec<String>>,
    inspections: Vec<Inspection>,
    run_configurations: Vec<KindEntry>,
    extensions: IndexMap<String, SettingsMap>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct EncodingsSection {
    encoding: Option<String>,
    bom_policy: Option<BomPolicy>,
    properties: Option<PropertiesEncoding>,
    mapping: IndexMap<String, String>,
}

/// Entry of a polymorphic container: kind tag and name, plus the fields
/// to set on the new entry.
#[derive(Debug, Deserialize)]
struct KindEntry {
    kind: String,
    name: String,
    #[serde(flatten)]
    fields: SettingsMap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ModuleSection {
    dir: Option<PathBuf>,
    package_prefix: IndexMap<String, String>,
    facets: Vec<KindEntry>,
    extensions: IndexMap<String, SettingsMap>,
}

/// Settings objects built from a manifest.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    project: ProjectSettings,
    modules: IndexMap<String, ModuleSettings>,
}

impl Manifest {
    /// Loads the manifest at `path`. Relative directories inside it are
    /// resolved against the manifest's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let path = std::path::absolute(path)
            .with_context(|| format!("Failed to resolve manifest path: {}", path.display()))?;
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("/"));
        let mut manifest = Self::parse(&text, base)
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;
        manifest.path = path;
        Ok(manifest)
    }

    /// Builds the settings described by `text`, resolving relative
    /// directories against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let file: ManifestFile = toml::from_str(text).context("Failed to parse manifest TOML")?;
        let host = file.project.host_version.unwrap_or_default();
        let root_dir = match &file.project.dir {
            Some(dir) => normalize_dir(&base.join(dir)),
            None => normalize_dir(base),
        };
        let root = ProjectScope::root(file.project.name, root_dir);

        let mut modules = IndexMap::new();
        for (name, section) in file.modules {
            let dir = section.dir.clone().unwrap_or_else(|| PathBuf::from(&name));
            let scope = root.child_at(&name, normalize_dir(&root.resolve(dir)));
            let settings = build_module(scope, host, section)
                .with_context(|| format!("Invalid settings for module '{name}'"))?;
            modules.insert(name, settings);
        }

        let module_scopes: Vec<ProjectScope> =
            modules.values().map(|module| module.scope().clone()).collect();
        let mut project = ProjectSettings::with_host(root, host);
        apply_project_settings(&mut project, &module_scopes, file.settings)
            .context("Invalid project settings")?;

        tracing::debug!(
            project = project.scope().name(),
            modules = modules.len(),
            %host,
            "Manifest loaded"
        );
        Ok(Self {
            path: base.join(MANIFEST_FILE),
            project,
            modules,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn project(&self) -> &ProjectSettings {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut ProjectSettings {
        &mut self.project
    }

    pub fn module(&self, name: &str) -> Option<&ModuleSettings> {
        self.modules.get(name)
    }

    pub fn module_mut(&mut self, name: &str) -> Option<&mut ModuleSettings> {
        self.modules.get_mut(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

fn apply_project_settings(
    project: &mut ProjectSettings,
    modules: &[ProjectScope],
    settings: SettingsSection,
) -> Result<()> {
    if let Some(overlay) = settings.compiler {
        apply_overlay(project.compiler(), &overlay).context("Invalid [settings.compiler]")?;
    }
    if let Some(overlay) = settings.groovy_compiler {
        apply_overlay(project.groovy_compiler(), &overlay)
            .context("Invalid [settings.groovy_compiler]")?;
    }
    if let Some(overlay) = settings.code_style {
        apply_overlay(project.code_style(), &overlay).context("Invalid [settings.code_style]")?;
    }
    if let Some(overlay) = settings.copyright {
        apply_overlay(project.copyright(), &overlay).context("Invalid [settings.copyright]")?;
    }
    if let Some(overlay) = settings.delegate_actions {
        apply_overlay(project.delegate_actions(), &overlay)
            .context("Invalid [settings.delegate_actions]")?;
    }
    if let Some(section) = settings.encodings {
        let encodings = project.encodings();
        encodings.encoding = section.encoding;
        encodings.bom_policy = section.bom_policy;
        encodings.properties = section.properties;
        for (path, encoding) in section.mapping {
            encodings.map(path, encoding);
        }
    }
    if !settings.do_not_detect_frameworks.is_empty() {
        project.do_not_detect_frameworks(settings.do_not_detect_frameworks);
    }

    for (phase, paths) in settings.task_triggers {
        let phase: Phase = phase.parse().map_err(anyhow::Error::msg)?;
        let tasks = paths
            .iter()
            .map(|path| task_ref(project.scope(), modules, path))
            .collect::<Result<Vec<_>>>()?;
        project.task_triggers().add(phase, tasks);
    }

    for inspection in settings.inspections {
        let name = inspection.name.clone();
        *project.inspections().create(&name)? = inspection;
    }

    for entry in settings.run_configurations {
        project
            .run_configurations()
            .create_by_kind(&entry.kind, &entry.name, &entry.fields)
            .with_context(|| format!("Invalid run configuration '{}'", entry.name))?;
    }

    register_extensions(project.extensions_mut(), settings.extensions)
}

fn build_module(
    scope: ProjectScope,
    host: HostVersion,
    section: ModuleSection,
) -> Result<ModuleSettings> {
    let mut module = ModuleSettings::with_host(scope, host);
    if !section.package_prefix.is_empty() {
        let prefixes = module.package_prefix();
        for (dir, prefix) in section.package_prefix {
            prefixes.insert(dir, prefix);
        }
    }
    for entry in section.facets {
        module
            .facets()
            .create_by_kind(&entry.kind, &entry.name, &entry.fields)
            .with_context(|| format!("Invalid facet '{}'", entry.name))?;
    }
    register_extensions(module.extensions_mut(), section.extensions)?;
    Ok(module)
}

fn register_extensions(
    registry: &mut ExtensionRegistry,
    extensions: IndexMap<String, SettingsMap>,
) -> Result<()> {
    for (name, table) in extensions {
        registry.add_convertible(name, table)?;
    }
    Ok(())
}

/// Resolves a host task path such as `:lib:report` to a task owned by the
/// matching module, or by a conventional child scope when no module in
/// the manifest has that path.
fn task_ref(root: &ProjectScope, modules: &[ProjectScope], path: &str) -> Result<TaskRef> {
    let Some(rest) = path.strip_prefix(':') else {
        bail!("Task path '{path}' must start with ':'");
    };
    let (project_path, task) = match rest.rsplit_once(':') {
        Some((project, task)) => (format!(":{project}"), task),
        None => (":".to_string(), rest),
    };
    if task.is_empty() {
        bail!("Task path '{path}' has no task name");
    }
    if project_path == ":" {
        return Ok(root.task(task));
    }
    if let Some(module) = modules.iter().find(|module| module.path() == project_path) {
        return Ok(module.task(task));
    }
    let mut scope = root.clone();
    for segment in project_path.trim_start_matches(':').split(':') {
        if segment.is_empty() {
            bail!("Task path '{path}' has an empty project segment");
        }
        scope = scope.child(segment);
    }
    Ok(scope.task(task))
}

/// Drops `.` components and folds `..` into the preceding directory so
/// joined directories render cleanly.
fn normalize_dir(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
