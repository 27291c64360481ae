//! Shared contracts for IDE settings export: the map-conversion capability,
//! project-scope handles, and the error taxonomy.

pub mod convert;
pub mod error;
pub mod types;

pub use convert::{MapConvertible, SettingsMap, to_settings_map};
pub use error::SettingsError;
pub use types::{HostVersion, ProjectScope, TaskRef};
