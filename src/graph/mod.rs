//! # Tensor Graphs
//!
//! The output of a conversion: per-label property tensors, per-label-pair
//! edge indices and the position → primary-key tables.
//!
//! | Container | Selected when |
//! |-----------|---------------|
//! | `GraphData` | exactly one label kept data |
//! | `HeteroGraphData` | two or more labels kept data |

use serde::{Deserialize, Serialize};

use crate::model::Value;
use crate::tensor::Tensor;

// ============================================================================
// Primary keys
// ============================================================================

/// Position → primary-key value of one label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyMap {
    keys: Vec<Value>,
}

impl PrimaryKeyMap {
    pub fn new(keys: Vec<Value>) -> Self {
        Self { keys }
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.keys.get(position)
    }

    /// Reverse lookup: the position holding `key`.
    pub fn position_of(&self, key: &Value) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(position, key)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.keys.iter().enumerate()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.keys
    }
}

/// The primary-key tables of a graph, shaped like the graph itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryKeys<'a> {
    Single(&'a PrimaryKeyMap),
    PerLabel(Vec<(&'a str, &'a PrimaryKeyMap)>),
}

// ============================================================================
// Stores
// ============================================================================

/// Nodes of one label: property tensors in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStore {
    pub label: String,
    pub num_nodes: usize,
    pub properties: Vec<(String, Tensor)>,
    pub primary_keys: PrimaryKeyMap,
}

impl NodeStore {
    pub fn get(&self, property: &str) -> Option<&Tensor> {
        self.properties.iter().find(|(name, _)| name == property).map(|(_, t)| t)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }
}

/// Edges from one label to another as a `(2, E)` index tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStore {
    pub src_label: String,
    pub dst_label: String,
    pub edge_index: Tensor,
}

impl EdgeStore {
    pub fn num_edges(&self) -> usize {
        self.edge_index.shape().get(1).copied().unwrap_or(0)
    }
}

// ============================================================================
// Containers
// ============================================================================

/// Single-type graph. Properties are addressed without a label key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: NodeStore,
    /// `None` when no relationship connected two kept nodes.
    pub edge_index: Option<Tensor>,
}

impl GraphData {
    pub fn get(&self, property: &str) -> Option<&Tensor> {
        self.nodes.get(property)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edge_index
            .as_ref()
            .and_then(|t| t.shape().get(1).copied())
            .unwrap_or(0)
    }
}

/// Multi-type graph keyed by label (nodes) and label pair (edges).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeteroGraphData {
    pub nodes: Vec<NodeStore>,
    pub edges: Vec<EdgeStore>,
}

impl HeteroGraphData {
    pub fn node(&self, label: &str) -> Option<&NodeStore> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn edge_index(&self, src_label: &str, dst_label: &str) -> Option<&Tensor> {
        self.edges
            .iter()
            .find(|e| e.src_label == src_label && e.dst_label == dst_label)
            .map(|e| &e.edge_index)
    }

    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.label.as_str())
    }

    pub fn edge_types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().map(|e| (e.src_label.as_str(), e.dst_label.as_str()))
    }
}

/// A converted graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "graph")]
pub enum GraphOutput {
    Homogeneous(GraphData),
    Heterogeneous(HeteroGraphData),
}

impl GraphOutput {
    pub fn is_heterogeneous(&self) -> bool {
        matches!(self, GraphOutput::Heterogeneous(_))
    }

    pub fn as_homogeneous(&self) -> Option<&GraphData> {
        match self {
            GraphOutput::Homogeneous(g) => Some(g),
            GraphOutput::Heterogeneous(_) => None,
        }
    }

    pub fn as_heterogeneous(&self) -> Option<&HeteroGraphData> {
        match self {
            GraphOutput::Heterogeneous(g) => Some(g),
            GraphOutput::Homogeneous(_) => None,
        }
    }

    /// Node store of `label`, in either mode.
    pub fn node_store(&self, label: &str) -> Option<&NodeStore> {
        match self {
            GraphOutput::Homogeneous(g) => (g.nodes.label == label).then_some(&g.nodes),
            GraphOutput::Heterogeneous(g) => g.node(label),
        }
    }

    pub fn primary_keys(&self) -> PrimaryKeys<'_> {
        match self {
            GraphOutput::Homogeneous(g) => PrimaryKeys::Single(&g.nodes.primary_keys),
            GraphOutput::Heterogeneous(g) => PrimaryKeys::PerLabel(
                g.nodes.iter().map(|n| (n.label.as_str(), &n.primary_keys)).collect(),
            ),
        }
    }
}
