//! Module-level settings facade.

use idex_core::{HostVersion, ProjectScope, SettingsError, SettingsMap};

use crate::container::PolymorphicContainer;
use crate::extensible::{ExtensibleSettings, SettingsDocument, materialize};
use crate::extension::ExtensionRegistry;
use crate::facets::facet_container;
use crate::package_prefix::PackagePrefixContainer;
use crate::project::{insert_section, insert_sequence};

/// Settings attached to one module of the build.
#[derive(Debug)]
pub struct ModuleSettings {
    base: ExtensibleSettings,
    scope: ProjectScope,
    facets: Option<PolymorphicContainer>,
    package_prefix: Option<PackagePrefixContainer>,
}

impl ModuleSettings {
    pub fn new(scope: ProjectScope) -> Self {
        Self::with_host(scope, HostVersion::CURRENT)
    }

    pub fn with_host(scope: ProjectScope, host: HostVersion) -> Self {
        Self {
            base: ExtensibleSettings::new(host),
            scope,
            facets: None,
            package_prefix: None,
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

    pub fn facets(&mut self) -> &mut PolymorphicContainer {
        let scope = &self.scope;
        materialize(&mut self.facets, "facets", || facet_container(scope))
    }

    pub fn configure_facets(
        &mut self,
        configure: impl FnOnce(&mut PolymorphicContainer) -> Result<(), SettingsError>,
    ) -> Result<&mut Self, SettingsError> {
        configure(self.facets())?;
        Ok(self)
    }

    pub fn package_prefix(&mut self) -> &mut PackagePrefixContainer {
        let scope = &self.scope;
        materialize(&mut self.package_prefix, "packagePrefix", || {
            PackagePrefixContainer::new(scope)
        })
    }

    pub fn configure_package_prefix(
        &mut self,
        configure: impl FnOnce(&mut PackagePrefixContainer),
    ) -> &mut Self {
        configure(self.package_prefix());
        self
    }
}

impl SettingsDocument for ModuleSettings {
    fn to_map(&self) -> Result<SettingsMap, SettingsError> {
        let mut map = self.base.collect_extensions()?;
        if let Some(facets) = &self.facets {
            insert_sequence(&mut map, "facets", facets.to_values());
        }
        insert_section(&mut map, "packagePrefix", self.package_prefix.as_ref());
        Ok(map)
    }
}
