use idex_core::{MapConvertible, SettingsMap, to_settings_map};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Copyright section (`copyright`): profiles and the scopes that use them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CopyrightConfig {
    /// Name of the profile applied where no scope matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default: Option<String>,
    /// Scope name to profile name.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub scopes: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub profiles: IndexMap<String, CopyrightProfile>,
}

impl CopyrightConfig {
    /// Returns the profile named `name`, creating it first if needed.
    pub fn profile(&mut self, name: &str) -> &mut CopyrightProfile {
        self.profiles
            .entry(name.to_string())
            .or_insert_with(|| CopyrightProfile {
                name: name.to_string(),
                ..Default::default()
            })
    }
}

impl MapConvertible for CopyrightConfig {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CopyrightProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_replace_regexp: Option<String>,
}
