use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::TypeDescriptor;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config key '{key}' (of record {record}) with required type `{expected}` is missing")]
    MissingKey {
        key: String,
        record: String,
        expected: TypeDescriptor,
    },

    #[error(
        "Config key '{key}' had value '{value}' with a type (`{found}`) other than the expected `{expected}`"
    )]
    InvalidType {
        key: String,
        value: String,
        found: String,
        expected: TypeDescriptor,
    },

    #[error("Can not init an existing instance of {record}: pass init values only when loading a new one")]
    InitOnExisting { record: String },

    #[error("Unknown keys for record {record}: {}", keys.join(", "))]
    UnknownKeys { record: String, keys: Vec<String> },

    #[error("Record {record} has no settable field '{field}'")]
    UnknownField { record: String, field: String },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Expected a table at '{key}', found {found}")]
    NotATable { key: String, found: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize init values: {0}")]
    Serialize(#[from] serde_json::Error),
}
