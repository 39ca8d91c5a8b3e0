//! Internal identifiers of physical graph entities.

use serde::{Deserialize, Serialize};

/// Opaque `(table, offset)` identity of a node inside one query result.
///
/// Only meaningful as a deduplication and lookup key. The `table` half
/// identifies the node table the entity lives in, which is how relationship
/// endpoints are mapped back to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InternalId {
    pub table: u64,
    pub offset: u64,
}

impl InternalId {
    pub const fn new(table: u64, offset: u64) -> Self {
        Self { table, offset }
    }
}

impl From<(u64, u64)> for InternalId {
    fn from((table, offset): (u64, u64)) -> Self {
        Self { table, offset }
    }
}

impl std::fmt::Display for InternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.table, self.offset)
    }
}
