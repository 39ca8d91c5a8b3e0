//! # Query Result Cursor
//!
//! The row-side contract between the converter and the query engine:
//! a resettable cursor over rows plus the output schema telling which
//! columns hold nodes and which hold relationships.
//!
//! ## Implementations
//!
//! | Cursor | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryResult` | `memory` | Materialized rows for testing/embedding |

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::model::{NodeRecord, RelRecord, Value};
use crate::{Error, Result};

pub use memory::MemoryResult;

// ============================================================================
// Output schema
// ============================================================================

/// What a result column carries, as far as graph extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Node,
    Rel,
    /// Anything else (scalars, paths, ...). Ignored by extraction.
    Other,
}

/// One column of the query's output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn node(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Node }
    }

    pub fn rel(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Rel }
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Other }
    }
}

/// The column positions to extract, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPlan {
    pub targets: Vec<(usize, ColumnKind)>,
}

impl ExtractionPlan {
    pub fn from_columns(columns: &[ColumnDescriptor]) -> Self {
        let targets = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind != ColumnKind::Other)
            .map(|(i, c)| (i, c.kind))
            .collect();
        Self { targets }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn has_relationships(&self) -> bool {
        self.targets.iter().any(|(_, k)| *k == ColumnKind::Rel)
    }

    pub fn has_nodes(&self) -> bool {
        self.targets.iter().any(|(_, k)| *k == ColumnKind::Node)
    }
}

// ============================================================================
// Rows
// ============================================================================

/// A single row of the result set, addressed by column position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self { values: values.into_iter().map(Into::into).collect() }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The node at `index`, or a type error naming what was found instead.
    pub fn node(&self, index: usize) -> Result<&NodeRecord> {
        let val = self.cell(index)?;
        val.as_node().ok_or_else(|| Error::TypeError {
            expected: "NODE".into(),
            got: val.type_name().into(),
        })
    }

    pub fn relationship(&self, index: usize) -> Result<&RelRecord> {
        let val = self.cell(index)?;
        val.as_relationship().ok_or_else(|| Error::TypeError {
            expected: "REL".into(),
            got: val.type_name().into(),
        })
    }

    fn cell(&self, index: usize) -> Result<&Value> {
        self.values
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("column {index}")))
    }
}

// ============================================================================
// ResultCursor Trait
// ============================================================================

/// A resettable, forward-only cursor over a query result.
///
/// Calls are synchronous; the converter imposes no timeout or cancellation.
pub trait ResultCursor {
    /// The output schema of the query.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Rewind to the first row.
    fn reset(&mut self) -> Result<()>;

    fn has_next(&self) -> bool;

    /// Fetch the next row. Calling past the end is a `Cursor` error.
    fn next_row(&mut self) -> Result<Row>;
}
