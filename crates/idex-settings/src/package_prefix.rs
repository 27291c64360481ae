use idex_core::types::normalize_separators;
use idex_core::{MapConvertible, ProjectScope, SettingsMap};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

/// Package prefixes for source roots of a module (`packagePrefix`).
///
/// Directories are resolved against the module directory and keyed with
/// forward slashes.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagePrefixContainer {
    scope: ProjectScope,
    prefixes: IndexMap<String, String>,
}

impl PackagePrefixContainer {
    pub fn new(scope: &ProjectScope) -> Self {
        Self {
            scope: scope.clone(),
            prefixes: IndexMap::new(),
        }
    }

    /// Sets the prefix of `dir`; a later call for the same directory wins.
    pub fn insert(&mut self, dir: impl AsRef<Path>, prefix: impl Into<String>) -> &mut Self {
        let resolved = normalize_separators(&self.scope.resolve(dir));
        self.prefixes.insert(resolved, prefix.into());
        self
    }

    pub fn get(&self, dir: impl AsRef<Path>) -> Option<&str> {
        let resolved = normalize_separators(&self.scope.resolve(dir));
        self.prefixes.get(&resolved).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl MapConvertible for PackagePrefixContainer {
    fn to_map(&self) -> SettingsMap {
        self.prefixes
            .iter()
            .map(|(dir, prefix)| (dir.clone(), Value::String(prefix.clone())))
            .collect()
    }
}
