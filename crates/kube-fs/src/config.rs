//! Format-agnostic document loading

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;
use serde_yaml::Value;

/// Format-agnostic document store.
///
/// Detects the format from the file extension and deserializes into any
/// serde type. Values, overrides and cluster definitions all go through
/// here so that parse failures always carry the offending path.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    ///
    /// Format is detected from file extension:
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        parse(path, &content)
    }

    /// Load a document into the generic value model.
    ///
    /// An empty (or whitespace-only) document yields `Value::Null`.
    pub fn load_value(&self, path: &NormalizedPath) -> Result<Value> {
        let content = io::read_text(path)?;
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        parse(path, &content)
    }

    /// Like [`ConfigStore::load_value`], but a missing file is `Ok(None)`.
    pub fn load_optional_value(&self, path: &NormalizedPath) -> Result<Option<Value>> {
        if !path.is_file() {
            tracing::trace!(%path, "Document absent");
            return Ok(None);
        }
        self.load_value(path).map(Some)
    }
}

fn parse<T: DeserializeOwned>(path: &NormalizedPath, content: &str) -> Result<T> {
    let extension = path.extension().unwrap_or("");
    match extension.to_lowercase().as_str() {
        "json" => serde_json::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        }),
        "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            format: "YAML".into(),
            message: e.to_string(),
        }),
        _ => Err(Error::UnsupportedFormat {
            extension: extension.to_string(),
        }),
    }
}
