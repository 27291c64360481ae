use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// String-keyed mapping of serializable values. Keys keep insertion order.
pub type SettingsMap = serde_json::Map<String, serde_json::Value>;

/// Capability of a configuration object to describe its state as a plain map.
pub trait MapConvertible {
    fn to_map(&self) -> SettingsMap;
}

impl<T: MapConvertible + ?Sized> MapConvertible for Box<T> {
    fn to_map(&self) -> SettingsMap {
        (**self).to_map()
    }
}

/// Shared handles convert through their current contents, so a collaborator
/// can keep mutating what it registered after attaching it.
impl<T: MapConvertible + ?Sized> MapConvertible for Rc<RefCell<T>> {
    fn to_map(&self) -> SettingsMap {
        self.borrow().to_map()
    }
}

impl MapConvertible for SettingsMap {
    fn to_map(&self) -> SettingsMap {
        self.clone()
    }
}

/// Converts a serde-serializable value into a [`SettingsMap`].
///
/// Values that do not serialize to a JSON object yield an empty map.
pub fn to_settings_map<T: Serialize + ?Sized>(value: &T) -> SettingsMap {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(
                kind = std::any::type_name::<T>(),
                "Expected an object when converting settings, got {}",
                json_kind(&other)
            );
            SettingsMap::new()
        }
        Err(e) => {
            tracing::warn!(
                kind = std::any::type_name::<T>(),
                "Failed to convert settings to a map: {}",
                e
            );
            SettingsMap::new()
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
