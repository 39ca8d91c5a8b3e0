//! Relationship record as it appears in a result row.

use serde::{Deserialize, Serialize};
use super::InternalId;

/// A relationship cell. It carries no label of its own; the edge is typed
/// by the labels of its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelRecord {
    pub src: InternalId,
    pub dst: InternalId,
}

impl RelRecord {
    pub fn new(src: impl Into<InternalId>, dst: impl Into<InternalId>) -> Self {
        Self { src: src.into(), dst: dst.into() }
    }
}
