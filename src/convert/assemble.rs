//! Final assembly of accumulated nodes and resolved edges into a tensor
//! graph container.

use hashbrown::HashMap;

use super::edges::ResolvedEdges;
use super::nodes::{LabelId, NodeAccumulator};
use super::WarningLog;
use crate::graph::{EdgeStore, GraphData, GraphOutput, HeteroGraphData, NodeStore, PrimaryKeyMap};
use crate::tensor::Tensor;

/// Builds the output graph once every row has been consumed.
#[derive(Debug, Default)]
pub struct GraphAssembler;

impl GraphAssembler {
    /// Assemble the graph, or `None` when no label kept any property column.
    ///
    /// One kept label yields a homogeneous `GraphData`; more yield a
    /// `HeteroGraphData`. Edge groups touching a label without data are
    /// dropped with a warning.
    pub fn assemble(
        nodes: NodeAccumulator,
        edges: ResolvedEdges,
        warnings: &mut WarningLog,
    ) -> Option<GraphOutput> {
        let mut stores: Vec<NodeStore> = Vec::new();
        let mut kept: HashMap<LabelId, usize> = HashMap::new();
        let mut names: Vec<String> = Vec::new();

        for (i, state) in nodes.into_labels().into_iter().enumerate() {
            names.push(state.name().to_string());
            if !state.has_data() {
                tracing::debug!(label = state.name(), nodes = state.count(), "label kept no property columns");
                continue;
            }
            let (label, columns, keys) = state.into_parts();
            let num_nodes = keys.len();
            let properties = columns
                .into_iter()
                .map(|(name, column)| (name, column.into_tensor()))
                .collect();
            kept.insert(LabelId(i as u32), stores.len());
            stores.push(NodeStore {
                label,
                num_nodes,
                properties,
                primary_keys: PrimaryKeyMap::new(keys),
            });
        }

        if stores.is_empty() {
            warnings.push("No nodes found or all nodes were ignored.");
            return None;
        }

        let mut edge_stores: Vec<EdgeStore> = Vec::new();
        for group in edges.groups {
            let src_label = &names[group.src.0 as usize];
            let dst_label = &names[group.dst.0 as usize];
            if !(kept.contains_key(&group.src) && kept.contains_key(&group.dst)) {
                warnings.push(format!(
                    "Relationships from {src_label} to {dst_label} are dropped because one of the labels has no usable properties.",
                ));
                continue;
            }
            edge_stores.push(EdgeStore {
                src_label: src_label.clone(),
                dst_label: dst_label.clone(),
                edge_index: Tensor::edge_index(&group.pairs),
            });
        }

        tracing::debug!(
            labels = stores.len(),
            edge_types = edge_stores.len(),
            heterogeneous = stores.len() > 1,
            "assembled tensor graph"
        );

        if stores.len() == 1 {
            let nodes = stores.remove(0);
            // Only the (L, L) group can survive with a single kept label.
            let edge_index = edge_stores.pop().map(|e| e.edge_index);
            return Some(GraphOutput::Homogeneous(GraphData { nodes, edge_index }));
        }

        Some(GraphOutput::Heterogeneous(HeteroGraphData {
            nodes: stores,
            edges: edge_stores,
        }))
    }
}
