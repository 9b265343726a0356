//! Document helpers shared by the pipeline and the built-in plugins.

use std::collections::BTreeMap;
use std::fs;
use std::iter::FromIterator;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::StudyError;

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => {
            let canonical_values = values.into_iter().map(canonicalize).collect();
            Value::Array(canonical_values)
        }
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with sorted keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, StudyError> {
    let value =
        serde_json::to_value(value).map_err(|err| StudyError::serde("json_serialize", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical)
        .map_err(|err| StudyError::serde("json_write", err))?;
    Ok(bytes)
}

/// Serializes a value as indented JSON, keeping document key order.
pub fn to_pretty_json_string<T: Serialize>(value: &T) -> Result<String, StudyError> {
    serde_json::to_string_pretty(value).map_err(|err| StudyError::serde("json_serialize", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, StudyError> {
    serde_json::from_slice(data).map_err(|err| StudyError::serde("json_deserialize", err))
}

/// Serializes a value into YAML, keeping document key order.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, StudyError> {
    serde_yaml::to_string(value).map_err(|err| StudyError::serde("yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, StudyError> {
    serde_yaml::from_slice(data).map_err(|err| StudyError::serde("yaml_deserialize", err))
}

/// Reads and parses a YAML document from disk.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, StudyError> {
    let bytes = fs::read(path).map_err(|err| StudyError::io("yaml_read", path, err))?;
    from_yaml_slice(&bytes).map_err(|err| match err {
        StudyError::Serde(info) => {
            StudyError::Serde(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}

/// Writes a YAML document, creating parent directories as needed.
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), StudyError> {
    ensure_parent(path)?;
    let text = to_yaml_string(value)?;
    fs::write(path, text).map_err(|err| StudyError::io("yaml_write", path, err))
}

/// Reads and parses a JSON document from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StudyError> {
    let bytes = fs::read(path).map_err(|err| StudyError::io("json_read", path, err))?;
    from_json_slice(&bytes)
}

/// Writes indented JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StudyError> {
    ensure_parent(path)?;
    let text = to_pretty_json_string(value)?;
    fs::write(path, text).map_err(|err| StudyError::io("json_write", path, err))
}

fn ensure_parent(path: &Path) -> Result<(), StudyError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| StudyError::io("dir_create", parent, err))?;
        }
    }
    Ok(())
}
