use super::*;
use idex_core::SettingsMap;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default, PartialEq)]
struct BuildInfo {
    version: String,
}

impl MapConvertible for BuildInfo {
    fn to_map(&self) -> SettingsMap {
        let mut map = SettingsMap::new();
        map.insert("version".into(), json!(self.version));
        map
    }
}

fn info(version: &str) -> BuildInfo {
    BuildInfo {
        version: version.to_string(),
    }
}

#[test]
fn test_add_and_get_typed_values() {
    let mut registry = ExtensionRegistry::default();
    registry.add_convertible("info", info("1.0")).unwrap();
    registry.add_opaque("marker", 42_u32).unwrap();

    assert_eq!(registry.get::<BuildInfo>("info"), Some(&info("1.0")));
    assert_eq!(registry.get::<u32>("marker"), Some(&42));
    assert!(registry.get::<String>("marker").is_none());
    assert!(registry.get::<BuildInfo>("missing").is_none());
}

#[test]
fn test_get_mut_changes_attached_value() {
    let mut registry = ExtensionRegistry::default();
    registry.add_convertible("info", info("1.0")).unwrap();
    registry.get_mut::<BuildInfo>("info").unwrap().version = "2.0".into();

    let value = registry.find_by_name("info").unwrap();
    let map = value.as_map_convertible().unwrap().to_map();
    assert_eq!(map["version"], json!("2.0"));
}

#[test]
fn test_duplicate_name_rejected() {
    let mut registry = ExtensionRegistry::default();
    registry.add_convertible("info", info("1.0")).unwrap();
    let err = registry.add_opaque("info", ()).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::DuplicateName { ref container, ref name }
            if container == "extensions" && name == "info"
    ));
    assert_eq!(registry.len(), 1);
    assert!(registry.holds::<BuildInfo>("info"));
}

#[test]
fn test_names_keep_registration_order() {
    let mut registry = ExtensionRegistry::default();
    registry.add_opaque("zeta", ()).unwrap();
    registry.add_convertible("alpha", info("1")).unwrap();
    registry.add_sequence("mid", Vec::new()).unwrap();

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    assert!(registry.contains("alpha"));
    assert!(!registry.contains("beta"));
}

#[test]
fn test_declared_type_recorded_per_entry() {
    let mut registry = ExtensionRegistry::default();
    registry.add_convertible("info", info("1")).unwrap();
    registry.add_sequence("items", Vec::new()).unwrap();
    registry.add_opaque("marker", 'x').unwrap();

    let info_type = registry.declared_type("info").unwrap();
    assert!(info_type.is_map_convertible());
    assert!(!info_type.is_iterable());

    let items_type = registry.declared_type("items").unwrap();
    assert!(items_type.is_iterable());
    assert!(!items_type.is_map_convertible());

    let marker_type = registry.declared_type("marker").unwrap();
    assert!(!marker_type.is_map_convertible());
    assert!(!marker_type.is_iterable());
}

#[test]
fn test_published_type_may_hide_runtime_capability() {
    let mut registry = ExtensionRegistry::default();
    registry
        .add_with_type(
            "hidden",
            DeclaredType::opaque::<dyn Any>(),
            Box::new(Convertible(info("1"))),
        )
        .unwrap();

    let declared = registry.declared_type("hidden").unwrap();
    assert!(!declared.is_map_convertible());
    assert!(registry.find_by_name("hidden").unwrap().as_map_convertible().is_some());
    assert!(registry.holds::<BuildInfo>("hidden"));
}

#[test]
fn test_shared_handle_stays_live() {
    let shared = Rc::new(RefCell::new(info("1.0")));
    let mut registry = ExtensionRegistry::default();
    registry.add_convertible("info", Rc::clone(&shared)).unwrap();

    shared.borrow_mut().version = "1.1".into();
    let value = registry.find_by_name("info").unwrap();
    assert_eq!(
        value.as_map_convertible().unwrap().to_map()["version"],
        json!("1.1")
    );
}

#[test]
fn test_sequence_exposes_elements() {
    let mut registry = ExtensionRegistry::default();
    let elements: Vec<Box<dyn ExtensionValue>> =
        vec![Box::new(Convertible(info("a"))), Box::new(Opaque("b"))];
    registry.add_sequence("items", elements).unwrap();

    let value = registry.find_by_name("items").unwrap();
    assert!(value.as_map_convertible().is_none());
    let elements = value.elements().unwrap();
    assert_eq!(elements.len(), 2);
    assert!(elements[0].as_map_convertible().is_some());
    assert!(elements[1].as_map_convertible().is_none());
}

#[test]
fn test_schema_accessors_follow_host_version() {
    let cases = [
        (HostVersion::new(3, 4), false, false),
        (HostVersion::new(3, 5), false, true),
        (HostVersion::new(4, 4), false, true),
        (HostVersion::new(4, 5), true, true),
        (HostVersion::new(4, 10), true, true),
        (HostVersion::new(5, 0), true, false),
        (HostVersion::CURRENT, true, false),
    ];
    for (host, rich, legacy) in cases {
        let mut registry = ExtensionRegistry::new(host);
        registry.add_convertible("info", info("1")).unwrap();
        assert_eq!(registry.supports_extensions_schema(), rich, "host {host}");
        assert_eq!(registry.supports_legacy_schema(), legacy, "host {host}");
        assert_eq!(registry.extensions_schema().is_some(), rich, "host {host}");
        assert_eq!(registry.legacy_schema().is_some(), legacy, "host {host}");
    }
}

#[test]
fn test_both_accessors_describe_same_entries() {
    let mut registry = ExtensionRegistry::new(HostVersion::new(4, 8));
    registry.add_convertible("info", info("1")).unwrap();
    registry.add_opaque("marker", ()).unwrap();

    let rich = registry.extensions_schema().unwrap();
    let legacy: Vec<SchemaEntry> = registry
        .legacy_schema()
        .unwrap()
        .into_iter()
        .map(|(name, public_type)| SchemaEntry { name, public_type })
        .collect();
    assert_eq!(rich, legacy);
}
