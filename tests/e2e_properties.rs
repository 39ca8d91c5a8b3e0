//! Property tests for deduplication and position contiguity.

use std::collections::{BTreeSet, HashSet};

use graph_tensor::{
    to_graph, ColumnDescriptor, MemoryResult, MemorySchemaSource, NodeRecord, PropertyDescriptor,
    RelRecord, Row, Value,
};
use proptest::prelude::*;
use proptest::sample::Index;

fn schema() -> MemorySchemaSource {
    MemorySchemaSource::new().with_properties(
        "V",
        [
            PropertyDescriptor::new("key", "INT64").primary_key(),
            PropertyDescriptor::new("w", "INT64"),
        ],
    )
}

fn vertex(offset: u64) -> NodeRecord {
    NodeRecord::new((0, offset), "V")
        .with_property("key", offset as i64)
        .with_property("w", offset as i64 * 3)
}

proptest! {
    #[test]
    fn dedup_positions_and_edges(
        seq in prop::collection::vec(0u64..20, 1..60),
        picks in prop::collection::vec((any::<Index>(), any::<Index>()), 0..80),
    ) {
        let edges: Vec<(u64, u64)> = picks
            .iter()
            .map(|(a, b)| (seq[a.index(seq.len())], seq[b.index(seq.len())]))
            .collect();

        let mut result = MemoryResult::new(vec![ColumnDescriptor::node("n"), ColumnDescriptor::rel("r")]);
        for i in 0..seq.len().max(edges.len()) {
            let node = seq.get(i).map_or(Value::Null, |&o| Value::from(vertex(o)));
            let rel = edges
                .get(i)
                .map_or(Value::Null, |&(s, d)| Value::from(RelRecord::new((0, s), (0, d))));
            result.push(Row::new([node, rel]));
        }

        let conversion = to_graph(&mut result, schema()).unwrap();
        prop_assert!(conversion.warnings.is_empty());
        let graph = conversion.graph.unwrap();
        let data = graph.as_homogeneous().unwrap();

        // One position per distinct node, in first-occurrence order.
        let mut seen = HashSet::new();
        let first_order: Vec<u64> = seq.iter().copied().filter(|o| seen.insert(*o)).collect();
        prop_assert_eq!(data.num_nodes(), first_order.len());

        let keys: Vec<Value> = first_order.iter().map(|&o| Value::Int(o as i64)).collect();
        prop_assert_eq!(data.nodes.primary_keys.as_slice(), keys.as_slice());

        let weights: Vec<i64> = first_order.iter().map(|&o| o as i64 * 3).collect();
        prop_assert_eq!(data.get("w").unwrap().as_i64(), Some(weights.as_slice()));

        // One edge per distinct pair, endpoints translated through positions.
        let expected: BTreeSet<(u64, u64)> = edges.iter().copied().collect();
        prop_assert_eq!(data.num_edges(), expected.len());
        if let Some(edge_index) = &data.edge_index {
            let pk = &data.nodes.primary_keys;
            let to_key = |pos: i64| match pk.get(pos as usize) {
                Some(Value::Int(k)) => *k as u64,
                other => panic!("no key at {pos}: {other:?}"),
            };
            let src = edge_index.row_i64(0).unwrap();
            let dst = edge_index.row_i64(1).unwrap();
            let actual: BTreeSet<(u64, u64)> =
                src.iter().zip(dst).map(|(&s, &d)| (to_key(s), to_key(d))).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
