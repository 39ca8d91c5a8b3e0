//! The metadata contract between the converter and the query engine.

use hashbrown::HashMap;

use super::{LabelSchema, PropertyDescriptor};
use crate::{Error, Result};

/// Answers "which properties does this label declare?".
///
/// The answer is descriptor text: a header line followed by one
/// `<name> <type-tokens>` line per property.
pub trait SchemaSource {
    fn property_schema(&self, label: &str) -> Result<String>;
}

impl<S: SchemaSource + ?Sized> SchemaSource for &S {
    fn property_schema(&self, label: &str) -> Result<String> {
        (**self).property_schema(label)
    }
}

/// In-memory schema source for testing and embedding.
///
/// Holds raw descriptor text per label and counts lookups, so callers can
/// observe how often the metadata source was actually hit.
#[derive(Debug, Default)]
pub struct MemorySchemaSource {
    tables: HashMap<String, String>,
    lookups: std::cell::Cell<usize>,
}

impl MemorySchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw descriptor text for a label.
    pub fn with_text(mut self, label: impl Into<String>, text: impl Into<String>) -> Self {
        self.tables.insert(label.into(), text.into());
        self
    }

    /// Register a label from typed descriptors, rendered as descriptor text.
    pub fn with_properties(
        self,
        label: impl Into<String>,
        properties: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self {
        let label = label.into();
        let mut text = format!("{label} properties:\n");
        for desc in properties {
            text.push('\t');
            text.push_str(&desc.to_line());
            text.push('\n');
        }
        self.with_text(label, text)
    }

    /// Number of `property_schema` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    /// Parse a registered label directly, bypassing any cache.
    pub fn schema(&self, label: &str) -> Option<LabelSchema> {
        self.tables.get(label).map(|text| LabelSchema::parse(label, text))
    }
}

impl SchemaSource for MemorySchemaSource {
    fn property_schema(&self, label: &str) -> Result<String> {
        self.lookups.set(self.lookups.get() + 1);
        self.tables
            .get(label)
            .cloned()
            .ok_or_else(|| Error::Schema(format!("unknown label '{label}'")))
    }
}
