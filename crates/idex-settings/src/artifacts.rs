//! Generated IDE artifacts (`ideArtifacts`): named trees of output layout
//! nodes.

use idex_core::types::normalize_separators;
use idex_core::{MapConvertible, ProjectScope, SettingsMap, to_settings_map};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::container::{Named, NamedContainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactKind {
    Artifact,
    Directory,
    Archive,
    File,
    ExtractedDirectory,
    LibraryFiles,
    ModuleOutput,
    ModuleTestOutput,
    ModuleSrc,
}

/// One node of an artifact layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactNode {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ArtifactNode>,
    #[serde(skip)]
    scope: Option<ProjectScope>,
}

impl ArtifactNode {
    fn new(kind: ArtifactKind, name: impl Into<String>, scope: Option<ProjectScope>) -> Self {
        Self {
            kind,
            name: name.into(),
            children: Vec::new(),
            scope,
        }
    }

    fn push(&mut self, kind: ArtifactKind, name: String) -> &mut ArtifactNode {
        let node = ArtifactNode::new(kind, name, self.scope.clone());
        self.children.push(node);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    fn resolve(&self, path: &Path) -> String {
        match &self.scope {
            Some(scope) => normalize_separators(&scope.resolve(path)),
            None => normalize_separators(path),
        }
    }

    /// Adds a directory node and configures its children.
    pub fn directory(&mut self, name: &str, configure: impl FnOnce(&mut ArtifactNode)) -> &mut Self {
        configure(self.push(ArtifactKind::Directory, name.to_string()));
        self
    }

    /// Adds an archive node and configures its children.
    pub fn archive(&mut self, name: &str, configure: impl FnOnce(&mut ArtifactNode)) -> &mut Self {
        configure(self.push(ArtifactKind::Archive, name.to_string()));
        self
    }

    /// Copies a file, resolved against the owning scope.
    pub fn file(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let resolved = self.resolve(path.as_ref());
        self.push(ArtifactKind::File, resolved);
        self
    }

    /// Extracts an archive's contents, resolved against the owning scope.
    pub fn extracted_directory(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let resolved = self.resolve(path.as_ref());
        self.push(ArtifactKind::ExtractedDirectory, resolved);
        self
    }

    pub fn library_files(&mut self, library: &str) -> &mut Self {
        self.push(ArtifactKind::LibraryFiles, library.to_string());
        self
    }

    pub fn module_output(&mut self, module: &str) -> &mut Self {
        self.push(ArtifactKind::ModuleOutput, module.to_string());
        self
    }

    pub fn module_test_output(&mut self, module: &str) -> &mut Self {
        self.push(ArtifactKind::ModuleTestOutput, module.to_string());
        self
    }

    pub fn module_src(&mut self, module: &str) -> &mut Self {
        self.push(ArtifactKind::ModuleSrc, module.to_string());
        self
    }

    /// Includes another artifact by name.
    pub fn artifact(&mut self, name: &str) -> &mut Self {
        self.push(ArtifactKind::Artifact, name.to_string());
        self
    }
}

/// Top-level artifact: a named root node.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeArtifact {
    root: ArtifactNode,
}

impl IdeArtifact {
    pub fn new(name: &str, scope: Option<ProjectScope>) -> Self {
        Self {
            root: ArtifactNode::new(ArtifactKind::Artifact, name, scope),
        }
    }

    pub fn root(&mut self) -> &mut ArtifactNode {
        &mut self.root
    }

    pub fn children(&self) -> &[ArtifactNode] {
        &self.root.children
    }
}

impl Named for IdeArtifact {
    fn name(&self) -> &str {
        &self.root.name
    }
}

impl MapConvertible for IdeArtifact {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(&self.root)
    }
}

/// Artifacts container whose entries resolve paths against `scope`.
pub fn artifact_container(scope: &ProjectScope) -> ArtifactContainer {
    let scope = scope.clone();
    ArtifactContainer {
        artifacts: NamedContainer::new("ideArtifacts", move |name| {
            IdeArtifact::new(name, Some(scope.clone()))
        }),
    }
}

#[derive(Debug)]
pub struct ArtifactContainer {
    artifacts: NamedContainer<IdeArtifact>,
}

impl ArtifactContainer {
    /// Returns the artifact named `name`, creating it if needed, and
    /// configures its root.
    pub fn artifact(&mut self, name: &str, configure: impl FnOnce(&mut ArtifactNode)) -> &mut Self {
        configure(self.artifacts.maybe_create(name).root());
        self
    }

    pub fn get(&self, name: &str) -> Option<&IdeArtifact> {
        self.artifacts.get(name)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn to_values(&self) -> Vec<serde_json::Value> {
        self.artifacts.to_values()
    }
}
