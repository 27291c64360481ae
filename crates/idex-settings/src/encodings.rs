use idex_core::types::normalize_separators;
use idex_core::{MapConvertible, ProjectScope, SettingsMap, to_settings_map};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BomPolicy {
    WithBom,
    WithNoBom,
    WithBomOnWindows,
}

/// File encodings section (`encodings`).
///
/// Mapping paths are resolved against the owning scope and stored with
/// forward slashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingConfig {
    #[serde(skip)]
    scope: Option<ProjectScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom_policy: Option<BomPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesEncoding>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

impl EncodingConfig {
    pub fn new(scope: &ProjectScope) -> Self {
        Self {
            scope: Some(scope.clone()),
            encoding: None,
            bom_policy: None,
            properties: None,
            mapping: IndexMap::new(),
        }
    }

    pub fn properties(&mut self) -> &mut PropertiesEncoding {
        self.properties.get_or_insert_with(PropertiesEncoding::default)
    }

    /// Assigns `encoding` to the file or directory at `path`.
    pub fn map(&mut self, path: impl AsRef<Path>, encoding: impl Into<String>) -> &mut Self {
        let resolved = match &self.scope {
            Some(scope) => scope.resolve(path),
            None => path.as_ref().to_path_buf(),
        };
        self.mapping
            .insert(normalize_separators(&resolved), encoding.into());
        self
    }
}

impl MapConvertible for EncodingConfig {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PropertiesEncoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent_native_to_ascii_conversion: Option<bool>,
}
