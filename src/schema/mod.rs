//! # Property Schemas
//!
//! Per-label property metadata: name, scalar kind, list dimension and the
//! primary-key flag. Metadata arrives as descriptor text from a
//! [`SchemaSource`] and is parsed once per label by [`PropertySchemaCache`].
//!
//! ## Descriptor text
//!
//! ```text
//! Person properties:            <- header, discarded
//!     id INT64(PRIMARY KEY)
//!     age INT64
//!     embedding DOUBLE[][]      <- each `[]` adds one list dimension
//!     name STRING
//! ```

pub mod cache;
pub mod source;

use serde::{Deserialize, Serialize};

pub use cache::PropertySchemaCache;
pub use source::{MemorySchemaSource, SchemaSource};

/// Marker embedded in the type tokens of the primary-key property.
pub const PRIMARY_KEY_MARKER: &str = "(PRIMARY KEY)";
/// Marker embedded once per list dimension.
pub const LIST_MARKER: &str = "[]";

// ============================================================================
// Scalar kinds
// ============================================================================

/// Element kind of a property, after list markers are stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Int64,
    Double,
    Bool,
    /// Anything a numeric tensor cannot hold (STRING, DATE, ...).
    Unsupported,
}

impl ScalarKind {
    pub fn parse(type_name: &str) -> Self {
        match type_name {
            "INT64" => ScalarKind::Int64,
            "DOUBLE" => ScalarKind::Double,
            "BOOL" | "BOOLEAN" => ScalarKind::Bool,
            _ => ScalarKind::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, ScalarKind::Unsupported)
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// One declared property of a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Type name with all markers stripped, e.g. `DOUBLE` for `DOUBLE[][]`.
    pub type_name: String,
    pub kind: ScalarKind,
    pub list_dims: usize,
    pub is_primary_key: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            kind: ScalarKind::parse(&type_name),
            type_name,
            list_dims: 0,
            is_primary_key: false,
        }
    }

    pub fn with_list_dims(mut self, dims: usize) -> Self {
        self.list_dims = dims;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Parse one `<name> <type-tokens>` line. Returns `None` for blank or
    /// malformed lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        let (name, type_tokens) = line.split_once(' ')?;
        let type_tokens = type_tokens.trim();
        if name.is_empty() || type_tokens.is_empty() {
            return None;
        }

        let is_primary_key = type_tokens.contains(PRIMARY_KEY_MARKER);
        let type_tokens = type_tokens.replace(PRIMARY_KEY_MARKER, "");
        let list_dims = type_tokens.matches(LIST_MARKER).count();
        let type_name = type_tokens.replace(LIST_MARKER, "").trim().to_string();

        Some(Self {
            name: name.to_string(),
            kind: ScalarKind::parse(&type_name),
            type_name,
            list_dims,
            is_primary_key,
        })
    }

    /// Render back into descriptor-text form.
    pub fn to_line(&self) -> String {
        let mut line = format!("{} {}", self.name, self.type_name);
        for _ in 0..self.list_dims {
            line.push_str(LIST_MARKER);
        }
        if self.is_primary_key {
            line.push_str(PRIMARY_KEY_MARKER);
        }
        line
    }
}

/// The ordered property list of one label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelSchema {
    pub label: String,
    pub properties: Vec<PropertyDescriptor>,
}

impl LabelSchema {
    /// Parse a descriptor text block. The first line is a header; blank and
    /// malformed lines are skipped. A repeated name replaces the earlier
    /// descriptor in place.
    pub fn parse(label: impl Into<String>, text: &str) -> Self {
        let mut properties: Vec<PropertyDescriptor> = Vec::new();
        for line in text.lines().skip(1) {
            let Some(desc) = PropertyDescriptor::parse_line(line) else {
                continue;
            };
            match properties.iter_mut().find(|p| p.name == desc.name) {
                Some(existing) => *existing = desc,
                None => properties.push(desc),
            }
        }
        Self { label: label.into(), properties }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn primary_key(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_primary_key)
    }
}
