//! Memoized per-label property schemas.

use std::sync::Arc;

use hashbrown::HashMap;

use super::{LabelSchema, SchemaSource};
use crate::Result;

/// Caches parsed [`LabelSchema`]s so the metadata source is queried at most
/// once per label for the lifetime of the cache.
///
/// Entries are handed out as `Arc`s: every caller sees the same, stably
/// ordered descriptor list, which keeps position and column alignment
/// reproducible across conversions.
#[derive(Debug, Default)]
pub struct PropertySchemaCache {
    entries: HashMap<String, Arc<LabelSchema>>,
}

impl PropertySchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the schema for `label`, querying `source` on a miss.
    pub fn get<S: SchemaSource + ?Sized>(&mut self, source: &S, label: &str) -> Result<Arc<LabelSchema>> {
        if let Some(schema) = self.entries.get(label) {
            return Ok(Arc::clone(schema));
        }
        let text = source.property_schema(label)?;
        let schema = Arc::new(LabelSchema::parse(label, &text));
        tracing::debug!(label, properties = schema.len(), "cached property schema");
        self.entries.insert(label.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Cached schema without touching the source.
    pub fn peek(&self, label: &str) -> Option<&Arc<LabelSchema>> {
        self.entries.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, e.g. after the underlying schema changed.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
