//! End-to-end edge cases: malformed properties, odd cells, empty inputs and
//! container mode selection.

use chrono::NaiveDate;
use graph_tensor::{
    to_graph, ColumnDescriptor, ConverterConfig, GraphConverter, MemoryResult,
    MemorySchemaSource, NodeRecord, PropertyDescriptor, RelRecord, Row, TensorData, Value,
};
use pretty_assertions::assert_eq;

fn item_schema() -> MemorySchemaSource {
    MemorySchemaSource::new().with_properties(
        "Item",
        [
            PropertyDescriptor::new("sku", "INT64").primary_key(),
            PropertyDescriptor::new("price", "DOUBLE"),
            PropertyDescriptor::new("vec", "DOUBLE").with_list_dims(1),
            PropertyDescriptor::new("grid", "INT64").with_list_dims(2),
            PropertyDescriptor::new("added", "DATE"),
        ],
    )
}

fn item(offset: u64) -> NodeRecord {
    NodeRecord::new((0, offset), "Item")
        .with_property("sku", offset as i64)
        .with_property("price", 1.0 + offset as f64)
        .with_property("vec", vec![0.5, 0.5])
        .with_property("grid", vec![vec![1i64, 2], vec![3, 4]])
}

fn single_node_column(nodes: impl IntoIterator<Item = NodeRecord>) -> MemoryResult {
    let mut result = MemoryResult::new(vec![ColumnDescriptor::node("n")]);
    for node in nodes {
        result.push(Row::new([node]));
    }
    result
}

// ============================================================================
// Empty inputs
// ============================================================================

#[test]
fn test_zero_rows_is_empty_with_warning() {
    let mut result = MemoryResult::new(vec![ColumnDescriptor::node("n")]);
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    assert!(conversion.graph.is_none());
    assert_eq!(conversion.warnings, vec!["No nodes found or all nodes were ignored.".to_string()]);
}

#[test]
fn test_no_graph_columns_is_empty() {
    let mut result = MemoryResult::new(vec![ColumnDescriptor::other("count")])
        .with_row(Row::new([42]));
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    assert!(conversion.graph.is_none());
    assert_eq!(conversion.stats.rows, 1);
    assert_eq!(conversion.stats.node_cells, 0);
}

#[test]
fn test_every_property_ignored_is_empty() {
    let mut result = single_node_column([
        NodeRecord::new((0, 0), "Item").with_property("sku", 1),
        NodeRecord::new((0, 1), "Item").with_property("sku", 2),
    ]);
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    assert!(conversion.graph.is_none());
    // price, vec, grid are missing (null); added is unsupported.
    assert_eq!(conversion.warnings.len(), 5);
}

// ============================================================================
// Retroactive ignore
// ============================================================================

#[test]
fn test_late_invalid_value_removes_column_entirely() {
    let mut nodes: Vec<_> = (0..4).map(item).collect();
    nodes.push(item(4).with_property("price", "free"));
    nodes.push(item(5));
    let mut result = single_node_column(nodes);

    let conversion = to_graph(&mut result, item_schema()).unwrap();
    let graph = conversion.graph.unwrap();
    let data = graph.as_homogeneous().unwrap();
    assert_eq!(data.num_nodes(), 6);
    assert!(data.get("price").is_none());
    assert_eq!(data.get("vec").unwrap().shape(), &[6, 2]);
    assert_eq!(data.get("grid").unwrap().shape(), &[6, 2, 2]);
    assert!(conversion
        .warnings
        .contains(&"Property Item.price has a value of type STRING that does not match its declared type DOUBLE. The property is ignored.".to_string()));
}

#[test]
fn test_shape_drift_removes_column() {
    let mut result = single_node_column([
        item(0),
        item(1),
        item(2).with_property("vec", vec![1.0, 2.0, 3.0]),
    ]);
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    let graph = conversion.graph.unwrap();
    let data = graph.as_homogeneous().unwrap();
    assert!(data.get("vec").is_none());
    assert_eq!(data.get("price").unwrap().as_f64(), Some(&[1.0, 2.0, 3.0][..]));
    assert!(conversion
        .warnings
        .contains(&"Property Item.vec has an inconsistent shape. The property is ignored.".to_string()));
}

#[test]
fn test_ragged_nested_list_removes_column() {
    let mut result = single_node_column([
        item(0),
        item(1).with_property("grid", vec![vec![1i64, 2], vec![3]]),
    ]);
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    let graph = conversion.graph.unwrap();
    assert!(graph.as_homogeneous().unwrap().get("grid").is_none());
}

#[test]
fn test_unsupported_type_warns_once() {
    let added = |day: u32| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    let mut result = single_node_column((0..5).map(|i| item(i).with_property("added", added(1 + i as u32))));
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    let unsupported: Vec<_> = conversion
        .warnings
        .iter()
        .filter(|w| w.contains("of type DATE is not supported"))
        .collect();
    assert_eq!(unsupported.len(), 1);
}

// ============================================================================
// Scalar strictness
// ============================================================================

#[test]
fn test_lenient_scalars_accept_integral_floats() {
    let schema = || MemorySchemaSource::new().with_properties("P", [PropertyDescriptor::new("n", "INT64")]);
    let rows = || {
        single_node_column([
            NodeRecord::new((0, 0), "P").with_property("n", 1),
            NodeRecord::new((0, 1), "P").with_property("n", 2.0),
        ])
    };

    let strict = to_graph(&mut rows(), schema()).unwrap();
    assert!(strict.graph.is_none());

    let config = ConverterConfig::default().with_strict_scalars(false);
    let lenient = GraphConverter::with_config(schema(), config).convert(&mut rows()).unwrap();
    let graph = lenient.graph.unwrap();
    assert_eq!(
        graph.as_homogeneous().unwrap().get("n").unwrap().data(),
        &TensorData::Int64(vec![1, 2])
    );
}

// ============================================================================
// Odd cells
// ============================================================================

#[test]
fn test_null_and_mistyped_cells_are_skipped() {
    let mut result = MemoryResult::new(vec![
        ColumnDescriptor::node("n"),
        ColumnDescriptor::rel("r"),
    ])
    .with_row(Row::new([Value::from(item(0)), Value::Null]))
    .with_row(Row::new([Value::Null, Value::from(RelRecord::new((0, 0), (0, 0)))]))
    .with_row(Row::new([Value::from(7), Value::from("not a rel")]))
    .with_row(Row::new([Value::from(item(1))]));

    let conversion = to_graph(&mut result, item_schema()).unwrap();
    assert_eq!(conversion.stats.node_cells, 2);
    assert_eq!(conversion.stats.rel_cells, 1);
    let graph = conversion.graph.unwrap();
    let data = graph.as_homogeneous().unwrap();
    assert_eq!(data.num_nodes(), 2);
    assert_eq!(data.edge_index.as_ref().unwrap().as_i64(), Some(&[0, 0][..]));
}

#[test]
fn test_relationship_only_projection_drops_all_edges() {
    let mut result = MemoryResult::new(vec![ColumnDescriptor::rel("r")])
        .with_row(Row::new([RelRecord::new((0, 0), (0, 1))]))
        .with_row(Row::new([RelRecord::new((0, 0), (0, 1))]));
    let conversion = to_graph(&mut result, item_schema()).unwrap();
    assert!(conversion.graph.is_none());
    assert_eq!(conversion.stats.edges_distinct, 1);
    assert_eq!(conversion.stats.edges_dropped, 1);
}

// ============================================================================
// Mode selection
// ============================================================================

#[test]
fn test_second_label_switches_to_heterogeneous() {
    let schema = item_schema().with_properties(
        "Shop",
        [
            PropertyDescriptor::new("name", "STRING").primary_key(),
            PropertyDescriptor::new("open", "BOOL"),
        ],
    );
    let shop = |offset: u64, name: &str| {
        NodeRecord::new((1, offset), "Shop")
            .with_property("name", name)
            .with_property("open", true)
    };
    let sells = |s: &NodeRecord, i: &NodeRecord| Value::from(RelRecord::new(s.id, i.id));

    let (s0, s1) = (shop(0, "north"), shop(1, "south"));
    let (i0, i1) = (item(0), item(1));
    let mut result = MemoryResult::new(vec![
        ColumnDescriptor::node("s"),
        ColumnDescriptor::rel("sells"),
        ColumnDescriptor::node("i"),
    ])
    .with_row(Row::new([Value::from(s0.clone()), sells(&s0, &i0), Value::from(i0.clone())]))
    .with_row(Row::new([Value::from(s0.clone()), sells(&s0, &i1), Value::from(i1.clone())]))
    .with_row(Row::new([Value::from(s1.clone()), sells(&s1, &i1), Value::from(i1.clone())]));

    let conversion = to_graph(&mut result, schema).unwrap();
    let graph = conversion.graph.unwrap();
    assert!(graph.is_heterogeneous());
    let hetero = graph.as_heterogeneous().unwrap();
    assert_eq!(hetero.node_types().collect::<Vec<_>>(), ["Shop", "Item"]);
    assert_eq!(hetero.edge_types().collect::<Vec<_>>(), [("Shop", "Item")]);

    let edge_index = hetero.edge_index("Shop", "Item").unwrap();
    assert_eq!(edge_index.row_i64(0), Some(&[0, 0, 1][..]));
    assert_eq!(edge_index.row_i64(1), Some(&[0, 1, 1][..]));

    match graph.primary_keys() {
        graph_tensor::PrimaryKeys::PerLabel(maps) => {
            assert_eq!(maps.len(), 2);
            assert_eq!(maps[0].0, "Shop");
            assert_eq!(maps[0].1.get(1), Some(&Value::from("south")));
            assert_eq!(maps[1].1.as_slice(), &[Value::Int(0), Value::Int(1)]);
        }
        other => panic!("expected per-label keys, got {other:?}"),
    }
}
