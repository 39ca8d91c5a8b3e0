//! Relationship accumulation and deferred endpoint resolution.
//!
//! Edges are collected as raw `(src, dst)` internal-id pairs while rows are
//! read. Positions are only final once every row has been seen, so
//! translation to positional indices runs as a second pass.

use hashbrown::{HashMap, HashSet};

use super::{MissingEndpointPolicy, NodeAccumulator, WarningLog};
use super::nodes::LabelId;
use crate::model::{InternalId, RelRecord};
use crate::{Error, Result};

/// Distinct directed `(src, dst)` pairs in first-seen order.
#[derive(Debug, Default)]
pub struct RelationshipAccumulator {
    seen: HashSet<(InternalId, InternalId)>,
    order: Vec<(InternalId, InternalId)>,
}

impl RelationshipAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a relationship. Returns `false` for a repeat of a known pair.
    pub fn observe(&mut self, rel: RelRecord) -> bool {
        let key = (rel.src, rel.dst);
        if !self.seen.insert(key) {
            return false;
        }
        self.order.push(key);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Translate every pair to `(src position, dst position)` and group by
    /// endpoint labels.
    ///
    /// An endpoint that never received a position is handled by `policy`:
    /// `Drop` skips the edge with one summary warning, `Fail` aborts.
    pub fn resolve(
        self,
        nodes: &NodeAccumulator,
        policy: MissingEndpointPolicy,
        warnings: &mut WarningLog,
    ) -> Result<ResolvedEdges> {
        let mut resolved = ResolvedEdges::default();
        let mut group_index: HashMap<(LabelId, LabelId), usize> = HashMap::new();

        for (src, dst) in self.order {
            let (src_label, src_pos, dst_label, dst_pos) =
                match (nodes.position(src), nodes.position(dst)) {
                    (Some((sl, sp)), Some((dl, dp))) => (sl, sp, dl, dp),
                    (s, _) => {
                        let endpoint = if s.is_none() { src } else { dst };
                        if policy == MissingEndpointPolicy::Fail {
                            return Err(Error::MissingEndpoint { src, dst, endpoint });
                        }
                        tracing::trace!(
                            %src, %dst, %endpoint,
                            label = nodes.table_label(endpoint.table).unwrap_or("<unknown>"),
                            "dropping edge with unplaced endpoint"
                        );
                        resolved.dropped += 1;
                        continue;
                    }
                };

            let next = resolved.groups.len();
            let slot = *group_index.entry((src_label, dst_label)).or_insert(next);
            if slot == next {
                resolved.groups.push(EdgeGroup { src: src_label, dst: dst_label, pairs: Vec::new() });
            }
            resolved.groups[slot].pairs.push((src_pos, dst_pos));
        }

        if resolved.dropped > 0 {
            warnings.push(format!(
                "{} relationship(s) reference nodes that were not extracted as nodes. These relationships are dropped.",
                resolved.dropped,
            ));
        }
        Ok(resolved)
    }
}

/// Position pairs between one ordered pair of labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGroup {
    pub src: LabelId,
    pub dst: LabelId,
    pub pairs: Vec<(usize, usize)>,
}

/// Output of the resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEdges {
    pub groups: Vec<EdgeGroup>,
    pub dropped: usize,
}

impl ResolvedEdges {
    pub fn edge_count(&self) -> usize {
        self.groups.iter().map(|g| g.pairs.len()).sum()
    }
}
