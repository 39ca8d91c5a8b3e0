//! # graph-tensor-rs — Property Graph Results as Tensor Graphs
//!
//! Turns the rows of a graph query result into a deduplicated,
//! column-oriented, numerically typed graph for graph-learning consumers.
//!
//! ## Design Principles
//!
//! 1. **Two narrow contracts**: `ResultCursor` supplies rows, `SchemaSource`
//!    supplies per-label property metadata
//! 2. **Clean DTOs**: `NodeRecord`, `RelRecord`, `Value` cross all boundaries
//! 3. **Warn, don't abort**: a bad property is dropped for its label and
//!    reported, never fatal
//! 4. **Two passes**: every node is placed before any edge is resolved
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_tensor::{
//!     ColumnDescriptor, GraphConverter, MemoryResult, MemorySchemaSource,
//!     NodeRecord, PropertyDescriptor, RelRecord, Row, Value,
//! };
//!
//! # fn example() -> graph_tensor::Result<()> {
//! let schema = MemorySchemaSource::new().with_properties("Person", [
//!     PropertyDescriptor::new("id", "INT64").primary_key(),
//!     PropertyDescriptor::new("age", "INT64"),
//! ]);
//!
//! let alice = NodeRecord::new((0, 0), "Person").with_property("id", 1).with_property("age", 30);
//! let bob = NodeRecord::new((0, 1), "Person").with_property("id", 2).with_property("age", 25);
//! let mut result = MemoryResult::new(vec![
//!     ColumnDescriptor::node("a"),
//!     ColumnDescriptor::rel("r"),
//!     ColumnDescriptor::node("b"),
//! ])
//! .with_row(Row::new([
//!     Value::from(alice),
//!     Value::from(RelRecord::new((0, 0), (0, 1))),
//!     Value::from(bob),
//! ]));
//!
//! let conversion = GraphConverter::new(schema).convert(&mut result)?;
//! let graph = conversion.graph.expect("one usable label");
//! let data = graph.as_homogeneous().expect("single label");
//! assert_eq!(data.get("age").and_then(|t| t.as_i64()), Some(&[30, 25][..]));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `arrow-results` | Export node stores and edge indices as Arrow `RecordBatch` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod schema;
pub mod result;
pub mod tensor;
pub mod convert;
pub mod graph;
#[cfg(feature = "arrow-results")]
pub mod arrow;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{InternalId, NodeRecord, RelRecord, Value, PropertyMap};

// ============================================================================
// Re-exports: Contracts
// ============================================================================

pub use schema::{
    LabelSchema, MemorySchemaSource, PropertyDescriptor, PropertySchemaCache,
    ScalarKind, SchemaSource,
};
pub use result::{ColumnDescriptor, ColumnKind, MemoryResult, ResultCursor, Row};

// ============================================================================
// Re-exports: Conversion
// ============================================================================

pub use convert::{
    to_graph, Conversion, ConversionStats, ConverterConfig, GraphConverter,
    MissingEndpointPolicy, NullPolicy,
};
pub use graph::{
    EdgeStore, GraphData, GraphOutput, HeteroGraphData, NodeStore, PrimaryKeyMap, PrimaryKeys,
};
pub use tensor::{Shape, Tensor, TensorData};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema source error: {0}")]
    Schema(String),

    #[error("Result cursor error: {0}")]
    Cursor(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Relationship {src} -> {dst} references node {endpoint}, which was never extracted")]
    MissingEndpoint { src: InternalId, dst: InternalId, endpoint: InternalId },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "arrow-results")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

pub type Result<T> = std::result::Result<T, Error>;
