use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("required source file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read source file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot tell the format of '{0}' (expected a .json or .toml extension)")]
    UnknownFormat(PathBuf),

    #[error("failed to parse JSON from {origin}: {source}")]
    JsonParse {
        origin: String,
        source: serde_json::Error,
    },

    #[error("failed to parse TOML from {origin}: {source}")]
    TomlParse {
        origin: String,
        source: toml::de::Error,
    },

    #[error("root of the document from {0} must be an object")]
    RootNotObject(String),

    #[error("unsupported {kind} value at '{path}'")]
    UnsupportedValue { path: String, kind: &'static str },
}
