//! The configuration mapping model and the cross-layer deep merge.
//!
//! Values are kept as ordered `serde_yaml` mappings: a resolved
//! configuration serializes back in the order its keys were first seen.

use kube_fs::NormalizedPath;
use serde_yaml::{Mapping, Value};

use crate::{Error, Result};

/// An ordered, arbitrarily nested configuration mapping.
pub type Values = Mapping;

/// Merge `other` into `into`; values from `other` win.
///
/// - a null in `other` deletes the key from `into`
/// - mappings present on both sides merge recursively
/// - anything else from `other` replaces the value in `into`
pub fn deep_merge(into: &mut Values, other: &Values) {
    deep_merge_with(into, other, true);
}

/// [`deep_merge`] with control over keys present on both sides.
///
/// With `overwrite = false` a scalar or sequence already in `into` is kept.
/// Nulls still delete and mappings still merge recursively.
pub fn deep_merge_with(into: &mut Values, other: &Values, overwrite: bool) {
    for (key, value) in other {
        if value.is_null() {
            into.shift_remove(key);
            continue;
        }

        if !into.contains_key(key) {
            into.insert(key.clone(), value.clone());
            continue;
        }

        if let Some(existing) = into.get_mut(key) {
            match (existing, value) {
                (Value::Mapping(existing), Value::Mapping(incoming)) => {
                    deep_merge_with(existing, incoming, overwrite);
                }
                (existing, _) => {
                    if overwrite {
                        *existing = value.clone();
                    }
                }
            }
        }
    }
}

/// Interpret a parsed document as a mapping. An empty document is an empty
/// mapping; any other non-mapping document is rejected.
pub fn into_values(document: Value, path: &NormalizedPath) -> Result<Values> {
    match document {
        Value::Mapping(values) => Ok(values),
        Value::Null => Ok(Values::new()),
        other => Err(Error::InvalidDocument {
            path: path.to_native(),
            message: format!("expected a mapping at the top level, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
