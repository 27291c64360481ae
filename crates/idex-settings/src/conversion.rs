//! Declared-type-driven conversion of extension values into plain maps.

use idex_core::SettingsMap;
use serde_json::Value;

use crate::extension::{DeclaredType, ExtensionValue};

/// Outcome of converting one extension value.
#[derive(Clone, Debug, PartialEq)]
pub enum Conversion {
    NotConvertible,
    SingleMap(SettingsMap),
    MapSequence(Vec<SettingsMap>),
}

impl Conversion {
    pub fn is_convertible(&self) -> bool {
        !matches!(self, Conversion::NotConvertible)
    }

    /// JSON form of the result; `None` when nothing was converted.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Conversion::NotConvertible => None,
            Conversion::SingleMap(map) => Some(Value::Object(map)),
            Conversion::MapSequence(maps) => {
                Some(Value::Array(maps.into_iter().map(Value::Object).collect()))
            }
        }
    }
}

/// Converts `value` according to the type it was published as.
///
/// A map-convertible declared type yields a single map. An iterable declared
/// type yields the maps of those elements that are individually
/// map-convertible, in order; elements that are not are dropped, and an
/// empty result counts as not convertible. Anything else is ignored.
pub fn convert(declared: &DeclaredType, value: Option<&dyn ExtensionValue>) -> Conversion {
    let Some(value) = value else {
        return Conversion::NotConvertible;
    };

    if declared.is_map_convertible() {
        return match value.as_map_convertible() {
            Some(convertible) => Conversion::SingleMap(convertible.to_map()),
            None => {
                tracing::debug!(
                    declared = declared.name(),
                    "Declared map-convertible but the value does not convert"
                );
                Conversion::NotConvertible
            }
        };
    }

    if declared.is_iterable() {
        let Some(elements) = value.elements() else {
            return Conversion::NotConvertible;
        };
        let maps: Vec<SettingsMap> = elements
            .into_iter()
            .filter_map(|element| element.as_map_convertible())
            .map(|convertible| convertible.to_map())
            .collect();
        return if maps.is_empty() {
            Conversion::NotConvertible
        } else {
            Conversion::MapSequence(maps)
        };
    }

    Conversion::NotConvertible
}
