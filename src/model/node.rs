//! Node record as it appears in a result row.

use serde::{Deserialize, Serialize};
use super::{InternalId, PropertyMap, Value};

static NULL: Value = Value::Null;

/// A node cell: its label, internal identity and raw property values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: InternalId,
    pub label: String,
    pub properties: PropertyMap,
}

impl NodeRecord {
    pub fn new(id: impl Into<InternalId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Raw value of a property. Missing keys read as `Null`.
    pub fn get(&self, key: &str) -> &Value {
        self.properties.get(key).unwrap_or(&NULL)
    }
}
