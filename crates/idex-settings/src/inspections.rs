use idex_core::{MapConvertible, SettingsMap, to_settings_map};
use serde::{Deserialize, Serialize};

use crate::container::{Named, NamedContainer};

/// One inspection override, addressed by inspection id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Inspection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl Inspection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Named for Inspection {
    fn name(&self) -> &str {
        &self.name
    }
}

impl MapConvertible for Inspection {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}

pub fn inspection_container() -> NamedContainer<Inspection> {
    NamedContainer::new("inspections", Inspection::new)
}
