//! Extensible IDE settings: named extensions attached after creation,
//! lazily built-in sections, and their export as one JSON document per
//! project or module.

pub mod artifacts;
pub mod code_style;
pub mod compiler;
pub mod container;
pub mod conversion;
pub mod copyright;
pub mod delegation;
pub mod encodings;
pub mod extensible;
pub mod extension;
pub mod facets;
pub mod inspections;
pub mod manifest;
pub mod module;
pub mod package_prefix;
pub mod project;
pub mod run_config;
pub mod schema;
pub mod triggers;

pub use container::{NamedContainer, PolymorphicContainer, PolymorphicEntry};
pub use conversion::{Conversion, convert};
pub use extensible::{ExtensibleSettings, SettingsDocument};
pub use extension::{
    Convertible, DeclaredType, ExtensionContainer, ExtensionRegistry, ExtensionValue, Opaque,
    SchemaEntry,
};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use module::ModuleSettings;
pub use project::ProjectSettings;
pub use schema::{SchemaSource, select_schema_source};
pub use triggers::{Phase, TaskTriggers};
