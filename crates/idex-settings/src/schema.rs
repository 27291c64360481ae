//! Extension schema discovery across host API versions.

use idex_core::SettingsError;
use std::fmt;

use crate::extension::{ExtensionContainer, LEGACY_SCHEMA_SINCE, SchemaEntry};

/// Enumerates the `(name, declared type)` pairs of a container's extensions.
///
/// Implementations must produce equivalent entries for the same container;
/// callers never need to know which one was selected.
pub trait SchemaSource: fmt::Debug + Sync {
    fn name(&self) -> &'static str;

    fn read(&self, container: &dyn ExtensionContainer) -> Result<Vec<SchemaEntry>, SettingsError>;
}

/// Reads the rich, ordered `extensions_schema` accessor.
#[derive(Debug)]
pub struct ExtensionsSchemaSource;

/// Reads the older name-to-type accessor.
#[derive(Debug)]
pub struct LegacySchemaSource;

static EXTENSIONS_SCHEMA: ExtensionsSchemaSource = ExtensionsSchemaSource;
static LEGACY_SCHEMA: LegacySchemaSource = LegacySchemaSource;

impl SchemaSource for ExtensionsSchemaSource {
    fn name(&self) -> &'static str {
        "extensions-schema"
    }

    fn read(&self, container: &dyn ExtensionContainer) -> Result<Vec<SchemaEntry>, SettingsError> {
        container
            .extensions_schema()
            .ok_or_else(|| unavailable(container))
    }
}

impl SchemaSource for LegacySchemaSource {
    fn name(&self) -> &'static str {
        "legacy-schema"
    }

    fn read(&self, container: &dyn ExtensionContainer) -> Result<Vec<SchemaEntry>, SettingsError> {
        let schema = container
            .legacy_schema()
            .ok_or_else(|| unavailable(container))?;
        Ok(schema
            .into_iter()
            .map(|(name, public_type)| SchemaEntry { name, public_type })
            .collect())
    }
}

/// Probes `container` for a usable accessor, preferring the rich one.
pub fn select_schema_source(
    container: &dyn ExtensionContainer,
) -> Result<&'static dyn SchemaSource, SettingsError> {
    let source: &'static dyn SchemaSource = if container.supports_extensions_schema() {
        &EXTENSIONS_SCHEMA
    } else if container.supports_legacy_schema() {
        &LEGACY_SCHEMA
    } else {
        return Err(unavailable(container));
    };
    tracing::debug!(
        host = %container.host_version(),
        source = source.name(),
        "Selected extension schema source"
    );
    Ok(source)
}

/// Selects a source and reads the schema in one step.
pub fn read_schema(container: &dyn ExtensionContainer) -> Result<Vec<SchemaEntry>, SettingsError> {
    select_schema_source(container)?.read(container)
}

fn unavailable(container: &dyn ExtensionContainer) -> SettingsError {
    SettingsError::SchemaUnavailable {
        found: container.host_version(),
        minimum: LEGACY_SCHEMA_SINCE,
    }
}
