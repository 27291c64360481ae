//! Named, typed extensions attached to a settings object after creation.
//!
//! The registry plays the role of the host's extension container: it records
//! each extension under a unique name together with the type it was
//! published as, and exposes the schema through the accessor shapes the
//! configured host version provides.

use idex_core::{HostVersion, MapConvertible, SettingsError};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;

/// First host version exposing the rich `extensions_schema` accessor.
pub const EXTENSIONS_SCHEMA_SINCE: HostVersion = HostVersion::new(4, 5);
/// First host version exposing the legacy name-to-type schema accessor.
pub const LEGACY_SCHEMA_SINCE: HostVersion = HostVersion::new(3, 5);
/// Host version that dropped the legacy accessor.
pub const LEGACY_SCHEMA_REMOVED_IN: HostVersion = HostVersion::new(5, 0);

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Runtime view of an attached extension value.
///
/// Both capabilities default to "absent"; implementors opt into the ones
/// their runtime value actually supports.
pub trait ExtensionValue: AsAny {
    /// The value's map conversion, if the runtime value supports it.
    fn as_map_convertible(&self) -> Option<&dyn MapConvertible> {
        None
    }

    /// The value's elements, if the runtime value is a sequence.
    fn elements(&self) -> Option<Vec<&dyn ExtensionValue>> {
        None
    }

    /// The user-facing value, unwrapped from any adapter.
    fn value_any(&self) -> &dyn Any {
        self.as_any()
    }

    fn value_any_mut(&mut self) -> &mut dyn Any {
        self.as_any_mut()
    }
}

/// Adapter for a map-convertible value.
#[derive(Debug, Clone, Default)]
pub struct Convertible<T>(pub T);

impl<T: MapConvertible + 'static> ExtensionValue for Convertible<T> {
    fn as_map_convertible(&self) -> Option<&dyn MapConvertible> {
        Some(&self.0)
    }

    fn value_any(&self) -> &dyn Any {
        &self.0
    }

    fn value_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }
}

/// Adapter for a value with no capability relevant to export.
#[derive(Debug, Clone, Default)]
pub struct Opaque<T>(pub T);

impl<T: 'static> ExtensionValue for Opaque<T> {
    fn value_any(&self) -> &dyn Any {
        &self.0
    }

    fn value_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }
}

/// Heterogeneous sequence; each element carries its own capabilities.
impl ExtensionValue for Vec<Box<dyn ExtensionValue>> {
    fn elements(&self) -> Option<Vec<&dyn ExtensionValue>> {
        Some(self.iter().map(|element| &**element).collect())
    }
}

/// The type an extension was published as.
///
/// Conversion decisions are driven by these flags rather than by the
/// runtime value, since a published supertype may promise less than the
/// value behind it delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclaredType {
    name: &'static str,
    map_convertible: bool,
    iterable: bool,
}

impl DeclaredType {
    pub const fn new(name: &'static str, map_convertible: bool, iterable: bool) -> Self {
        Self {
            name,
            map_convertible,
            iterable,
        }
    }

    pub fn convertible<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>(), true, false)
    }

    pub fn iterable<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>(), false, true)
    }

    pub fn opaque<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>(), false, false)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_map_convertible(&self) -> bool {
        self.map_convertible
    }

    pub fn is_iterable(&self) -> bool {
        self.iterable
    }
}

/// One `(name, declared type)` pair of an extension schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub public_type: DeclaredType,
}

/// Host facility that holds named extensions and describes them.
///
/// Hosts expose the schema through one or both of two accessor shapes
/// depending on their version; callers probe with the `supports_*` methods.
pub trait ExtensionContainer {
    fn host_version(&self) -> HostVersion;

    fn supports_extensions_schema(&self) -> bool;

    fn supports_legacy_schema(&self) -> bool;

    /// Rich accessor: ordered schema entries.
    fn extensions_schema(&self) -> Option<Vec<SchemaEntry>>;

    /// Legacy accessor: name to declared type.
    fn legacy_schema(&self) -> Option<IndexMap<String, DeclaredType>>;

    fn find_by_name(&self, name: &str) -> Option<&dyn ExtensionValue>;
}

struct Extension {
    declared: DeclaredType,
    value: Box<dyn ExtensionValue>,
}

/// Append-only registry of named extensions owned by a settings object.
pub struct ExtensionRegistry {
    host: HostVersion,
    entries: IndexMap<String, Extension>,
}

impl ExtensionRegistry {
    pub fn new(host: HostVersion) -> Self {
        Self {
            host,
            entries: IndexMap::new(),
        }
    }

    /// Attaches `value` under `name`, published as `declared`.
    pub fn add_with_type(
        &mut self,
        name: impl Into<String>,
        declared: DeclaredType,
        value: Box<dyn ExtensionValue>,
    ) -> Result<(), SettingsError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(SettingsError::DuplicateName {
                container: "extensions".to_string(),
                name,
            });
        }
        tracing::debug!(extension = %name, declared = declared.name(), "Extension attached");
        self.entries.insert(name, Extension { declared, value });
        Ok(())
    }

    /// Attaches a map-convertible value published as its own type.
    pub fn add_convertible<T: MapConvertible + 'static>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<(), SettingsError> {
        self.add_with_type(
            name,
            DeclaredType::convertible::<T>(),
            Box::new(Convertible(value)),
        )
    }

    /// Attaches a heterogeneous sequence published as an iterable type.
    pub fn add_sequence(
        &mut self,
        name: impl Into<String>,
        elements: Vec<Box<dyn ExtensionValue>>,
    ) -> Result<(), SettingsError> {
        self.add_with_type(
            name,
            DeclaredType::iterable::<Vec<Box<dyn ExtensionValue>>>(),
            Box::new(elements),
        )
    }

    /// Attaches a value that is not relevant to export.
    pub fn add_opaque<T: 'static>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<(), SettingsError> {
        self.add_with_type(name, DeclaredType::opaque::<T>(), Box::new(Opaque(value)))
    }

    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.entries.get(name)?.value.value_any().downcast_ref()
    }

    pub fn get_mut<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.entries
            .get_mut(name)?
            .value
            .value_any_mut()
            .downcast_mut()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn declared_type(&self, name: &str) -> Option<DeclaredType> {
        self.entries.get(name).map(|entry| entry.declared)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a value of runtime type `T` was attached under `name`.
    pub fn holds<T: 'static>(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.value.value_any().is::<T>())
    }
}

impl ExtensionContainer for ExtensionRegistry {
    fn host_version(&self) -> HostVersion {
        self.host
    }

    fn supports_extensions_schema(&self) -> bool {
        self.host >= EXTENSIONS_SCHEMA_SINCE
    }

    fn supports_legacy_schema(&self) -> bool {
        self.host >= LEGACY_SCHEMA_SINCE && self.host < LEGACY_SCHEMA_REMOVED_IN
    }

    fn extensions_schema(&self) -> Option<Vec<SchemaEntry>> {
        if !self.supports_extensions_schema() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|(name, entry)| SchemaEntry {
                    name: name.clone(),
                    public_type: entry.declared,
                })
                .collect(),
        )
    }

    fn legacy_schema(&self) -> Option<IndexMap<String, DeclaredType>> {
        if !self.supports_legacy_schema() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.declared))
                .collect(),
        )
    }

    fn find_by_name(&self, name: &str) -> Option<&dyn ExtensionValue> {
        self.entries.get(name).map(|entry| &*entry.value)
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new(HostVersion::CURRENT)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("host", &self.host)
            .field(
                "entries",
                &self
                    .entries
                    .iter()
                    .map(|(name, entry)| (name.as_str(), entry.declared.name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
#[path = "extension_tests.rs"]
mod tests;
