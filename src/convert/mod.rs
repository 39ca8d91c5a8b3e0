//! # Result → Tensor Graph Conversion
//!
//! Drives one pass over a [`ResultCursor`], feeding node cells to the
//! [`NodeAccumulator`] and relationship cells to the
//! [`RelationshipAccumulator`], then resolves edges and assembles the graph.
//!
//! ```text
//! rows ──► NodeAccumulator ─────────────┐
//!     └──► RelationshipAccumulator ──► resolve ──► GraphAssembler ──► GraphOutput
//!                                                         └──► WarningLog (flushed last)
//! ```
//!
//! Per-property anomalies never fail a conversion: they are recorded as
//! warnings and the offending property is dropped for its whole label.

pub mod assemble;
pub mod edges;
pub mod nodes;
pub mod warnings;

use serde::{Deserialize, Serialize};

use crate::graph::GraphOutput;
use crate::model::Value;
use crate::result::{ColumnKind, ExtractionPlan, ResultCursor};
use crate::schema::{PropertySchemaCache, SchemaSource};
use crate::Result;

pub use assemble::GraphAssembler;
pub use edges::{EdgeGroup, RelationshipAccumulator, ResolvedEdges};
pub use nodes::{Column, LabelId, LabelState, NodeAccumulator, Observed};
pub use warnings::WarningLog;

// ============================================================================
// Configuration
// ============================================================================

/// What to do with a relationship whose endpoint never received a position
/// (filtered out of the projection, or rejected during extraction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingEndpointPolicy {
    /// Drop the edge and record a warning.
    #[default]
    Drop,
    /// Abort the conversion with `Error::MissingEndpoint`.
    Fail,
}

/// What a null property value does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Ignore the property for the whole label.
    #[default]
    IgnoreProperty,
    /// Reject the node; it receives no position.
    SkipNode,
}

/// Conversion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub missing_endpoint: MissingEndpointPolicy,
    pub null_values: NullPolicy,
    /// Require scalar cells to match the declared kind exactly
    /// (integers still widen to DOUBLE).
    pub strict_scalars: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            missing_endpoint: MissingEndpointPolicy::Drop,
            null_values: NullPolicy::IgnoreProperty,
            strict_scalars: true,
        }
    }
}

impl ConverterConfig {
    pub fn with_missing_endpoint(mut self, policy: MissingEndpointPolicy) -> Self {
        self.missing_endpoint = policy;
        self
    }

    pub fn with_null_values(mut self, policy: NullPolicy) -> Self {
        self.null_values = policy;
        self
    }

    pub fn with_strict_scalars(mut self, strict: bool) -> Self {
        self.strict_scalars = strict;
        self
    }
}

// ============================================================================
// Conversion result
// ============================================================================

/// Counters for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub rows: u64,
    pub node_cells: u64,
    pub rel_cells: u64,
    pub nodes_placed: u64,
    pub nodes_rejected: u64,
    pub edges_distinct: u64,
    pub edges_dropped: u64,
}

/// Output of [`GraphConverter::convert`].
#[derive(Debug, Clone)]
pub struct Conversion {
    /// `None` when no node kept any usable property.
    pub graph: Option<GraphOutput>,
    /// Deduplicated warnings in first-seen order.
    pub warnings: Vec<String>,
    pub stats: ConversionStats,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        self.graph.is_none()
    }
}

// ============================================================================
// GraphConverter
// ============================================================================

/// Converts query results into tensor graphs.
///
/// Owns the schema source and a [`PropertySchemaCache`] that survives
/// across `convert` calls, so repeated conversions against the same schema
/// query metadata at most once per label.
pub struct GraphConverter<S: SchemaSource> {
    source: S,
    cache: PropertySchemaCache,
    config: ConverterConfig,
}

impl<S: SchemaSource> GraphConverter<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ConverterConfig::default())
    }

    pub fn with_config(source: S, config: ConverterConfig) -> Self {
        Self { source, cache: PropertySchemaCache::new(), config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn schema_cache(&self) -> &PropertySchemaCache {
        &self.cache
    }

    pub fn schema_cache_mut(&mut self) -> &mut PropertySchemaCache {
        &mut self.cache
    }

    /// Convert the whole result behind `cursor`, starting from its first row.
    ///
    /// Warnings are flushed exactly once, after assembly, whether or not a
    /// graph came out. `Err` is reserved for cursor or schema-source
    /// failures and for `MissingEndpointPolicy::Fail`.
    pub fn convert<C: ResultCursor + ?Sized>(&mut self, cursor: &mut C) -> Result<Conversion> {
        let mut warnings = WarningLog::new();
        match self.run(cursor, &mut warnings) {
            Ok((graph, stats)) => Ok(Conversion { graph, warnings: warnings.flush(), stats }),
            Err(err) => {
                warnings.flush();
                Err(err)
            }
        }
    }

    fn run<C: ResultCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        warnings: &mut WarningLog,
    ) -> Result<(Option<GraphOutput>, ConversionStats)> {
        cursor.reset()?;
        let plan = ExtractionPlan::from_columns(cursor.columns());
        let mut stats = ConversionStats::default();
        let mut nodes = NodeAccumulator::new(self.config);
        let mut rels = RelationshipAccumulator::new();

        // Pass 1: nodes and raw edges.
        while cursor.has_next() {
            let row = cursor.next_row()?;
            stats.rows += 1;
            for &(index, kind) in &plan.targets {
                match (kind, row.get(index)) {
                    (ColumnKind::Node, Some(Value::Node(node))) => {
                        stats.node_cells += 1;
                        nodes.observe(node, &mut self.cache, &self.source, warnings)?;
                    }
                    (ColumnKind::Rel, Some(Value::Relationship(rel))) => {
                        stats.rel_cells += 1;
                        rels.observe(*rel);
                    }
                    (kind, cell) => {
                        tracing::trace!(index, ?kind, cell = cell.map(crate::model::Value::type_name), "skipping cell");
                    }
                }
            }
        }
        stats.nodes_placed = nodes.placed() as u64;
        stats.nodes_rejected = nodes.rejected() as u64;
        stats.edges_distinct = rels.len() as u64;

        // Pass 2: positions are final, translate edges.
        let edges = rels.resolve(&nodes, self.config.missing_endpoint, warnings)?;
        stats.edges_dropped = edges.dropped as u64;

        tracing::debug!(
            rows = stats.rows,
            nodes = stats.nodes_placed,
            rejected = stats.nodes_rejected,
            edges = edges.edge_count(),
            dropped = stats.edges_dropped,
            "collected result"
        );

        let graph = GraphAssembler::assemble(nodes, edges, warnings);
        Ok((graph, stats))
    }
}

/// One-shot conversion with default settings and a throwaway cache.
pub fn to_graph<C, S>(cursor: &mut C, source: S) -> Result<Conversion>
where
    C: ResultCursor + ?Sized,
    S: SchemaSource,
{
    GraphConverter::new(source).convert(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_builders() {
        let config = ConverterConfig::default();
        assert_eq!(config.missing_endpoint, MissingEndpointPolicy::Drop);
        assert_eq!(config.null_values, NullPolicy::IgnoreProperty);
        assert!(config.strict_scalars);

        let config = config
            .with_missing_endpoint(MissingEndpointPolicy::Fail)
            .with_strict_scalars(false);
        assert_eq!(config.missing_endpoint, MissingEndpointPolicy::Fail);
        assert!(!config.strict_scalars);
    }

    #[test]
    fn test_config_from_json() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"missing_endpoint": "fail", "null_values": "skip_node"}"#).unwrap();
        assert_eq!(config.missing_endpoint, MissingEndpointPolicy::Fail);
        assert_eq!(config.null_values, NullPolicy::SkipNode);
        assert!(config.strict_scalars);
    }
}
