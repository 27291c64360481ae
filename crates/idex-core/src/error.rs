use crate::types::HostVersion;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error(
        "Extension schema is unavailable on host version {found}: upgrade the host to {minimum} or newer"
    )]
    SchemaUnavailable {
        found: HostVersion,
        minimum: HostVersion,
    },

    #[error("'{name}' is already registered in {container}")]
    DuplicateName { container: String, name: String },

    #[error("No factory registered in {container} for kind '{kind}'")]
    UnknownKind { container: String, kind: String },

    #[error("Entry '{name}' in {container} is not of kind '{expected}'")]
    KindMismatch {
        container: String,
        name: String,
        expected: String,
    },

    #[error("Invalid host version '{0}': expected MAJOR.MINOR[.PATCH]")]
    InvalidHostVersion(String),

    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}
