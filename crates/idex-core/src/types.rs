use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SettingsError;

/// Version of the host build environment the settings are attached to.
///
/// Only `major.minor` matters for capability gating; `patch` is kept so the
/// version round-trips through error messages unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    /// Host version assumed when none is configured.
    pub const CURRENT: HostVersion = HostVersion::new(8, 5);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: 0,
        }
    }

    pub const fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for HostVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for HostVersion {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidHostVersion(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32, SettingsError> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let major = next(true)?;
        let minor = next(true)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::with_patch(major, minor, patch))
    }
}

impl TryFrom<String> for HostVersion {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HostVersion> for String {
    fn from(value: HostVersion) -> Self {
        value.to_string()
    }
}

/// Handle to a project scope in the host build: its path in the project
/// hierarchy (`:` for the root, `:app` for a child) and its directories.
///
/// The handle is a back-reference used to resolve identifiers; it owns
/// nothing that the settings objects depend on for their lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectScope {
    path: String,
    name: String,
    project_dir: PathBuf,
    root_dir: PathBuf,
}

impl ProjectScope {
    /// Top-level scope located at `dir`.
    pub fn root(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            path: ":".to_string(),
            name: name.into(),
            project_dir: dir.clone(),
            root_dir: dir,
        }
    }

    /// Child scope in the conventional `<parent dir>/<name>` location.
    pub fn child(&self, name: &str) -> Self {
        let dir = self.project_dir.join(name);
        self.child_at(name, dir)
    }

    /// Child scope located at an explicit directory.
    pub fn child_at(&self, name: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            path: self.qualify(name),
            name: name.to_string(),
            project_dir: dir.into(),
            root_dir: self.root_dir.clone(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn is_root(&self) -> bool {
        self.path == ":"
    }

    /// Resolves `relative` against this scope's directory. Absolute paths
    /// are returned unchanged.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(relative)
    }

    /// Reference to a task owned by this scope.
    pub fn task(&self, name: &str) -> TaskRef {
        TaskRef {
            path: self.qualify(name),
            project: self.clone(),
        }
    }

    fn qualify(&self, name: &str) -> String {
        if self.is_root() {
            format!(":{name}")
        } else {
            format!("{}:{name}", self.path)
        }
    }
}

/// Reference to a build action (task) by its host path and owning scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRef {
    path: String,
    project: ProjectScope,
}

impl TaskRef {
    pub fn new(path: impl Into<String>, project: ProjectScope) -> Self {
        Self {
            path: path.into(),
            project,
        }
    }

    /// Host path of the task, e.g. `:app:compileJava`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn project(&self) -> &ProjectScope {
        &self.project
    }

    /// Location of the top-level scope that owns this task, with `/`
    /// separators regardless of the platform that produced it.
    pub fn owner_path(&self) -> String {
        normalize_separators(self.project.root_dir())
    }
}

/// Renders `path` with forward slashes only.
pub fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
