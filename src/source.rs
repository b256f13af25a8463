//! Where raw data comes from and which part of it a record reads.
//!
//! A [`Source`] is read into a raw [`Table`] (TOML files and TOML text are
//! parsed, in-memory data is taken as is). [`select`] then narrows that table
//! down to the mapping a record is loaded from:
//!
//! 1. An empty mapping stays empty.
//! 2. An explicit key is a dotted path (`"tool.myapp"`). The empty key means
//!    the whole mapping.
//! 3. Without a key, a mapping with a single top-level table is unwrapped.
//! 4. Otherwise the record name in snake case (`ToolConfig` -> `tool_config`)
//!    is tried as a top-level key.
//! 5. If nothing matched, the whole mapping is used.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::naming::camel_to_snake;
use crate::value::{Table, Value, table_from_toml};

/// Input data for a load.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A TOML file on disk.
    Path(PathBuf),
    /// TOML document text.
    Toml(String),
    /// An in-memory mapping. Must hold a table.
    Data(Value),
}

impl Source {
    /// Shorthand for [`Source::Toml`].
    pub fn toml(content: impl Into<String>) -> Self {
        Source::Toml(content.into())
    }

    /// Produce the raw top-level table.
    pub fn read(&self) -> Result<Table, ConfigError> {
        match self {
            Source::Path(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
                        path: path.clone(),
                        source,
                    })?;
                debug!(path = %path.display(), "read config file");
                parse_toml(&content, path)
            }
            Source::Toml(content) => parse_toml(content, Path::new("<inline>")),
            Source::Data(Value::Table(table)) => Ok(table.clone()),
            Source::Data(other) => Err(ConfigError::NotATable {
                key: String::new(),
                found: other.kind().to_string(),
            }),
        }
    }
}

fn parse_toml(content: &str, path: &Path) -> Result<Table, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(table_from_toml(table))
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<Table> for Source {
    fn from(table: Table) -> Self {
        Source::Data(Value::Table(table))
    }
}

impl From<toml::Table> for Source {
    fn from(table: toml::Table) -> Self {
        Source::Data(Value::Table(table_from_toml(table)))
    }
}

impl From<serde_json::Value> for Source {
    fn from(value: serde_json::Value) -> Self {
        Source::Data(Value::from(value))
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Data(value)
    }
}

/// Walk a dotted key through nested tables.
///
/// Every segment must exist and hold a table.
pub fn table_get<'a>(table: &'a Table, dotted_key: &str) -> Result<&'a Table, ConfigError> {
    let mut current = table;
    let mut walked = String::new();
    for segment in dotted_key.split('.') {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        current = match current.get(segment) {
            Some(Value::Table(inner)) => inner,
            Some(other) => {
                return Err(ConfigError::NotATable {
                    key: walked,
                    found: other.kind().to_string(),
                });
            }
            None => return Err(ConfigError::KeyNotFound(walked)),
        };
    }
    Ok(current)
}

/// Pick the mapping a record named `record_name` is loaded from.
pub fn select(table: Table, key: Option<&str>, record_name: &str) -> Result<Table, ConfigError> {
    if table.is_empty() {
        return Ok(table);
    }

    if let Some(key) = key {
        if key.is_empty() {
            debug!(record = record_name, "empty key, using the whole mapping");
            return Ok(table);
        }
        debug!(record = record_name, key, "using explicit key");
        return table_get(&table, key).cloned();
    }

    if table.len() == 1
        && let Some((sole, Value::Table(inner))) = table.iter().next()
    {
        debug!(record = record_name, key = %sole, "using sole top-level key");
        return Ok(inner.clone());
    }

    let guessed = camel_to_snake(record_name);
    if let Some(Value::Table(inner)) = table.get(&guessed) {
        debug!(record = record_name, key = %guessed, "using key guessed from record name");
        return Ok(inner.clone());
    }

    debug!(record = record_name, "no key matched, using the whole mapping");
    Ok(table)
}
