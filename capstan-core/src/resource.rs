//! Generic decoded manifest resource.
//!
//! A [`Resource`] is one YAML document decoded into an order-preserving
//! mapping. It carries no schema beyond the fields every manifest is
//! expected to have — `apiVersion`, `kind`, `metadata.name` and (for
//! namespaced resources) `metadata.namespace` — and stays generic for
//! everything else.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::ResourceError;

/// One decoded manifest document.
///
/// Wraps an order-preserving `serde_yaml::Mapping`; key order from the
/// source document survives decode and re-serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Mapping);

impl Resource {
    /// Decode one YAML document.
    ///
    /// Fails with [`ResourceError::Parse`] on malformed input and
    /// [`ResourceError::NotAMapping`] when the top level is anything but a
    /// mapping. No schema validation happens here.
    pub fn from_yaml(doc: &str) -> Result<Self, ResourceError> {
        let value: Value = serde_yaml::from_str(doc).map_err(ResourceError::Parse)?;
        match value {
            Value::Mapping(mapping) => Ok(Resource(mapping)),
            other => Err(ResourceError::NotAMapping {
                found: value_type(&other),
            }),
        }
    }

    /// Re-serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String, ResourceError> {
        serde_yaml::to_string(&self.0).map_err(ResourceError::Serialize)
    }

    /// The `apiVersion` field.
    pub fn api_version(&self) -> Result<&str, ResourceError> {
        self.str_field(&["apiVersion"])
    }

    /// The `kind` field.
    pub fn kind(&self) -> Result<&str, ResourceError> {
        self.str_field(&["kind"])
    }

    /// The `metadata.name` field.
    pub fn name(&self) -> Result<&str, ResourceError> {
        self.str_field(&["metadata", "name"])
    }

    /// The `metadata.namespace` field; `None` for cluster-scoped resources.
    pub fn namespace(&self) -> Option<&str> {
        self.lookup(&["metadata", "namespace"]).and_then(Value::as_str)
    }

    /// Raw access to a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The underlying mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.get(*key)?;
        }
        Some(current)
    }

    fn str_field(&self, path: &[&str]) -> Result<&str, ResourceError> {
        self.lookup(path)
            .and_then(Value::as_str)
            .ok_or_else(|| ResourceError::FieldMissing {
                path: path.join("."),
            })
    }
}

impl From<Mapping> for Resource {
    fn from(mapping: Mapping) -> Self {
        Resource(mapping)
    }
}

fn value_type(value: &Value) -> &'static str {
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
