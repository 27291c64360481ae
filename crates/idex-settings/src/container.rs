//! Named containers for built-in sections that hold several entries.

use idex_core::{MapConvertible, ProjectScope, SettingsError, SettingsMap};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;

use crate::extension::AsAny;

/// Entry addressed by name inside a container.
pub trait Named {
    fn name(&self) -> &str;
}

/// Insertion-ordered container of same-typed entries, created by name.
pub struct NamedContainer<T> {
    label: &'static str,
    factory: Box<dyn Fn(&str) -> T>,
    items: IndexMap<String, T>,
}

impl<T: Named> NamedContainer<T> {
    pub fn new(label: &'static str, factory: impl Fn(&str) -> T + 'static) -> Self {
        Self {
            label,
            factory: Box::new(factory),
            items: IndexMap::new(),
        }
    }

    /// Creates a new entry; fails if `name` is taken.
    pub fn create(&mut self, name: &str) -> Result<&mut T, SettingsError> {
        if self.items.contains_key(name) {
            return Err(SettingsError::DuplicateName {
                container: self.label.to_string(),
                name: name.to_string(),
            });
        }
        Ok(self.maybe_create(name))
    }

    /// Returns the entry named `name`, creating it first if needed.
    pub fn maybe_create(&mut self, name: &str) -> &mut T {
        let factory = &self.factory;
        self.items
            .entry(name.to_string())
            .or_insert_with(|| factory(name))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.items.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: MapConvertible> NamedContainer<T> {
    /// Each entry's map, in creation order.
    pub fn to_values(&self) -> Vec<Value> {
        self.items
            .values()
            .map(|item| Value::Object(item.to_map()))
            .collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for NamedContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedContainer")
            .field("label", &self.label)
            .field("items", &self.items)
            .finish()
    }
}

/// Entry of a polymorphic container: a named instance of some kind.
pub trait PolymorphicEntry: MapConvertible + AsAny + fmt::Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;
}

type BuildFn = Box<dyn Fn(&str, &ProjectScope) -> Box<dyn PolymorphicEntry>>;
type ConfigureFn = Box<dyn Fn(&mut dyn PolymorphicEntry, &SettingsMap) -> Result<(), SettingsError>>;

struct KindFactory {
    kind: &'static str,
    build: BuildFn,
    configure: ConfigureFn,
}

struct Slot {
    type_id: TypeId,
    entry: Box<dyn PolymorphicEntry>,
}

impl Slot {
    fn entry(&self) -> &dyn PolymorphicEntry {
        &*self.entry
    }
}

/// Container of named entries of several kinds.
///
/// A factory is registered per concrete kind; entries are instantiated
/// through it when a caller declares one under a name. Lookup goes by the
/// registered type, or by its kind tag for untyped callers.
pub struct PolymorphicContainer {
    label: &'static str,
    scope: ProjectScope,
    factories: IndexMap<TypeId, KindFactory>,
    entries: IndexMap<String, Slot>,
}

impl PolymorphicContainer {
    pub fn new(label: &'static str, scope: ProjectScope) -> Self {
        Self {
            label,
            scope,
            factories: IndexMap::new(),
            entries: IndexMap::new(),
        }
    }

    /// Registers `factory` for entries of type `T`, tagged `kind`.
    pub fn register<T>(&mut self, kind: &'static str, factory: fn(&str, &ProjectScope) -> T) -> &mut Self
    where
        T: PolymorphicEntry + Serialize + DeserializeOwned,
    {
        self.factories.insert(
            TypeId::of::<T>(),
            KindFactory {
                kind,
                build: Box::new(
                    move |name: &str, scope: &ProjectScope| -> Box<dyn PolymorphicEntry> {
                        Box::new(factory(name, scope))
                    },
                ),
                configure: Box::new(
                    |entry: &mut dyn PolymorphicEntry,
                     overlay: &SettingsMap|
                     -> Result<(), SettingsError> {
                        match (*entry).as_any_mut().downcast_mut::<T>() {
                            Some(typed) => apply_overlay(typed, overlay),
                            None => Ok(()),
                        }
                    },
                ),
            },
        );
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.values().map(|factory| factory.kind)
    }

    /// Creates a new entry of type `T`; fails if `name` is taken.
    pub fn create<T: PolymorphicEntry>(&mut self, name: &str) -> Result<&mut T, SettingsError> {
        if self.entries.contains_key(name) {
            return Err(self.duplicate(name));
        }
        self.maybe_create(name)
    }

    /// Returns the entry named `name` as a `T`, creating it if needed.
    pub fn maybe_create<T: PolymorphicEntry>(&mut self, name: &str) -> Result<&mut T, SettingsError> {
        let type_id = TypeId::of::<T>();
        if !self.entries.contains_key(name) {
            let factory = self
                .factories
                .get(&type_id)
                .ok_or_else(|| SettingsError::UnknownKind {
                    container: self.label.to_string(),
                    kind: std::any::type_name::<T>().to_string(),
                })?;
            let entry = (factory.build)(name, &self.scope);
            self.entries.insert(name.to_string(), Slot { type_id, entry });
        }
        let label = self.label;
        self.entries
            .get_mut(name)
            .and_then(|slot| (*slot.entry).as_any_mut().downcast_mut::<T>())
            .ok_or_else(|| SettingsError::KindMismatch {
                container: label.to_string(),
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// Creates an entry by kind tag and applies `overlay` on top of the
    /// factory defaults.
    pub fn create_by_kind(
        &mut self,
        kind: &str,
        name: &str,
        overlay: &SettingsMap,
    ) -> Result<&mut dyn PolymorphicEntry, SettingsError> {
        if self.entries.contains_key(name) {
            return Err(self.duplicate(name));
        }
        let (type_id, factory) = self
            .factories
            .iter()
            .find(|(_, factory)| factory.kind.eq_ignore_ascii_case(kind))
            .ok_or_else(|| SettingsError::UnknownKind {
                container: self.label.to_string(),
                kind: kind.to_string(),
            })?;
        let mut entry = (factory.build)(name, &self.scope);
        (factory.configure)(&mut *entry, overlay)?;
        let slot = Slot {
            type_id: *type_id,
            entry,
        };
        let label = self.label;
        let index = self.entries.insert_full(name.to_string(), slot).0;
        match self.entries.get_index_mut(index) {
            Some((_, slot)) => Ok(&mut *slot.entry),
            None => Err(SettingsError::DuplicateName {
                container: label.to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn PolymorphicEntry> {
        self.entries.get(name).map(Slot::entry)
    }

    pub fn get_as<T: PolymorphicEntry>(&self, name: &str) -> Option<&T> {
        let slot = self.entries.get(name)?;
        if slot.type_id != TypeId::of::<T>() {
            return None;
        }
        (*slot.entry).as_any().downcast_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn PolymorphicEntry> {
        self.entries.values().map(Slot::entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each entry's map, in creation order.
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().map(|entry| Value::Object(entry.to_map())).collect()
    }

    fn duplicate(&self, name: &str) -> SettingsError {
        SettingsError::DuplicateName {
            container: self.label.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Debug for PolymorphicContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicContainer")
            .field("label", &self.label)
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Overwrites the fields of `target` named in `overlay`, keeping the rest.
/// Keys that `T` does not declare are rejected when `T` denies unknown
/// fields.
pub fn apply_overlay<T>(target: &mut T, overlay: &SettingsMap) -> Result<(), SettingsError>
where
    T: Serialize + DeserializeOwned,
{
    if overlay.is_empty() {
        return Ok(());
    }
    let mut current = match serde_json::to_value(&*target)? {
        Value::Object(map) => map,
        _ => SettingsMap::new(),
    };
    for (key, value) in overlay {
        current.insert(key.clone(), value.clone());
    }
    *target = serde_json::from_value(Value::Object(current))?;
    Ok(())
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
