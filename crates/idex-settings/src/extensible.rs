use idex_core::{HostVersion, SettingsError, SettingsMap};
use serde_json::Value;
use std::cell::OnceCell;

use crate::conversion::convert;
use crate::extension::{ExtensionContainer, ExtensionRegistry};
use crate::schema::{SchemaSource, select_schema_source};

/// Settings object that collaborators can extend with named sections.
///
/// The schema source is probed on first collection and reused afterwards.
#[derive(Debug, Default)]
pub struct ExtensibleSettings {
    extensions: ExtensionRegistry,
    schema_source: OnceCell<&'static dyn SchemaSource>,
}

impl ExtensibleSettings {
    pub fn new(host: HostVersion) -> Self {
        Self {
            extensions: ExtensionRegistry::new(host),
            schema_source: OnceCell::new(),
        }
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.extensions
    }

    /// One entry per attached extension whose value converts; entries that
    /// do not convert are left out without affecting the others.
    pub fn collect_extensions(&self) -> Result<SettingsMap, SettingsError> {
        let source = self.schema_source()?;
        let mut result = SettingsMap::new();
        for entry in source.read(&self.extensions)? {
            let value = self.extensions.find_by_name(&entry.name);
            match convert(&entry.public_type, value).into_value() {
                Some(converted) => {
                    result.insert(entry.name, converted);
                }
                None => {
                    tracing::debug!(
                        extension = %entry.name,
                        declared = entry.public_type.name(),
                        "Skipping extension without a map conversion"
                    );
                }
            }
        }
        Ok(result)
    }

    fn schema_source(&self) -> Result<&'static dyn SchemaSource, SettingsError> {
        if let Some(source) = self.schema_source.get() {
            return Ok(*source);
        }
        let source = select_schema_source(&self.extensions)?;
        Ok(*self.schema_source.get_or_init(|| source))
    }
}

/// A settings facade that renders to one JSON document.
///
/// Rendering always reflects the state at call time.
pub trait SettingsDocument {
    /// Attached extensions merged with the materialized built-in sections.
    fn to_map(&self) -> Result<SettingsMap, SettingsError>;

    fn render(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(&Value::Object(self.to_map()?))?)
    }

    fn render_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(&Value::Object(self.to_map()?))?)
    }
}

/// Returns the slot's section, creating it on first access.
pub(crate) fn materialize<'a, T>(
    slot: &'a mut Option<T>,
    key: &'static str,
    init: impl FnOnce() -> T,
) -> &'a mut T {
    slot.get_or_insert_with(|| {
        tracing::debug!(section = key, "Materializing built-in section");
        init()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{Convertible, ExtensionValue, Opaque};
    use idex_core::MapConvertible;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    impl MapConvertible for Counter {
        fn to_map(&self) -> SettingsMap {
            let mut map = SettingsMap::new();
            map.insert("hits".into(), json!(self.hits));
            map
        }
    }

    fn element<T: ExtensionValue>(value: T) -> Box<dyn ExtensionValue> {
        Box::new(value)
    }

    #[test]
    fn test_empty_settings_collect_nothing() {
        let settings = ExtensibleSettings::default();
        assert!(settings.collect_extensions().unwrap().is_empty());
    }

    #[test]
    fn test_convertible_extension_uses_its_own_map() {
        let mut settings = ExtensibleSettings::default();
        settings
            .extensions_mut()
            .add_convertible("counter", Counter { hits: 3 })
            .unwrap();
        let collected = settings.collect_extensions().unwrap();
        assert_eq!(collected["counter"], json!({ "hits": 3 }));
    }

    #[test]
    fn test_bad_entries_do_not_abort_collection() {
        let mut settings = ExtensibleSettings::default();
        let extensions = settings.extensions_mut();
        extensions.add_opaque("opaque", "nothing to see").unwrap();
        extensions
            .add_sequence("empty", vec![element(Opaque(1_u8))])
            .unwrap();
        extensions.add_convertible("counter", Counter::default()).unwrap();
        extensions
            .add_sequence(
                "mixed",
                vec![element(Opaque(())), element(Convertible(Counter { hits: 9 }))],
            )
            .unwrap();

        let collected = settings.collect_extensions().unwrap();
        let keys: Vec<_> = collected.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["counter", "mixed"]);
        assert_eq!(collected["mixed"], json!([{ "hits": 9 }]));
    }

    #[test]
    fn test_collection_reflects_current_state() {
        let shared = Rc::new(RefCell::new(Counter::default()));
        let mut settings = ExtensibleSettings::default();
        settings
            .extensions_mut()
            .add_convertible("counter", Rc::clone(&shared))
            .unwrap();

        assert_eq!(settings.collect_extensions().unwrap()["counter"], json!({ "hits": 0 }));
        shared.borrow_mut().hits = 5;
        assert_eq!(settings.collect_extensions().unwrap()["counter"], json!({ "hits": 5 }));
    }

    #[test]
    fn test_legacy_host_collects_same_entries() {
        let mut settings = ExtensibleSettings::new(HostVersion::new(4, 1));
        settings
            .extensions_mut()
            .add_convertible("counter", Counter { hits: 1 })
            .unwrap();
        let collected = settings.collect_extensions().unwrap();
        assert_eq!(collected["counter"], json!({ "hits": 1 }));
    }

    #[test]
    fn test_unsupported_host_fails_collection() {
        let mut settings = ExtensibleSettings::new(HostVersion::new(2, 14));
        settings
            .extensions_mut()
            .add_convertible("counter", Counter::default())
            .unwrap();
        assert!(matches!(
            settings.collect_extensions(),
            Err(SettingsError::SchemaUnavailable { .. })
        ));
    }
}
