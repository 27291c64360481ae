//! Module facets (`facets`) and the built-in Spring facet.

use idex_core::{MapConvertible, ProjectScope, SettingsMap};
use serde::{Deserialize, Serialize};

use crate::container::{PolymorphicContainer, PolymorphicEntry};
use crate::run_config::tagged_map;

/// Spring facet: named application contexts made of config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SpringFacet {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<SpringContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SpringContext {
    pub name: String,
    pub file: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl SpringFacet {
    fn create(name: &str, _scope: &ProjectScope) -> Self {
        Self {
            name: name.to_string(),
            contexts: Vec::new(),
        }
    }

    /// Returns the context named `name`, creating it first if needed.
    pub fn context(&mut self, name: &str) -> &mut SpringContext {
        let index = match self.contexts.iter().position(|context| context.name == name) {
            Some(index) => index,
            None => {
                self.contexts.push(SpringContext {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.contexts.len() - 1
            }
        };
        &mut self.contexts[index]
    }
}

impl MapConvertible for SpringFacet {
    fn to_map(&self) -> SettingsMap {
        tagged_map("spring", self)
    }
}

impl PolymorphicEntry for SpringFacet {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "spring"
    }
}

/// Facet container with the built-in kinds registered.
pub fn facet_container(scope: &ProjectScope) -> PolymorphicContainer {
    let mut container = PolymorphicContainer::new("facets", scope.clone());
    container.register("spring", SpringFacet::create);
    container
}
