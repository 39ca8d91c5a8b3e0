//! In-memory result cursor.
//!
//! Reference implementation of `ResultCursor` over materialized rows.
//! Use it for tests, fixtures and hosts that already hold the whole result.

use super::{ColumnDescriptor, ResultCursor, Row};
use crate::model::Value;
use crate::{Error, Result};

/// Materialized query result.
#[derive(Debug, Clone, Default)]
pub struct MemoryResult {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
    cursor: usize,
}

impl MemoryResult {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns, rows: Vec::new(), cursor: 0 }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Build from host JSON rows (arrays of cells, one per column).
    pub fn from_json_rows(
        columns: Vec<ColumnDescriptor>,
        rows: impl IntoIterator<Item = serde_json::Value>,
    ) -> Result<Self> {
        let mut result = Self::new(columns);
        for json in rows {
            match Value::from_json(json)? {
                Value::List(values) => result.push(Row { values }),
                other => {
                    return Err(Error::TypeError {
                        expected: "row array".into(),
                        got: other.type_name().into(),
                    });
                }
            }
        }
        Ok(result)
    }

    /// Build from a JSON document holding an array of row arrays.
    pub fn from_json_str(columns: Vec<ColumnDescriptor>, json: &str) -> Result<Self> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Self::from_json_rows(columns, rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ResultCursor for MemoryResult {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn has_next(&self) -> bool {
        self.cursor < self.rows.len()
    }

    fn next_row(&mut self) -> Result<Row> {
        let row = self
            .rows
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| Error::Cursor(format!("no row at index {}", self.cursor)))?;
        self.cursor += 1;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iterate_and_reset() {
        let mut result = MemoryResult::new(vec![ColumnDescriptor::other("x")])
            .with_row(Row::new([1]))
            .with_row(Row::new([2]));
        let mut seen = Vec::new();
        while result.has_next() {
            seen.push(result.next_row().unwrap().values[0].clone());
        }
        assert_eq!(seen, vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(result.next_row(), Err(Error::Cursor(_))));

        result.reset().unwrap();
        assert!(result.has_next());
    }

    #[test]
    fn test_from_json_rows() {
        let result = MemoryResult::from_json_rows(
            vec![ColumnDescriptor::node("a"), ColumnDescriptor::rel("r")],
            [json!([
                {"_label": "A", "_id": {"table": 0, "offset": 0}},
                {"_src": {"table": 0, "offset": 0}, "_dst": {"table": 0, "offset": 1}},
            ])],
        )
        .unwrap();
        assert_eq!(result.len(), 1);

        let bad = MemoryResult::from_json_rows(vec![], [json!({"not": "a row"})]);
        assert!(matches!(bad, Err(Error::TypeError { .. })));
    }

    #[test]
    fn test_from_json_str() {
        let result = MemoryResult::from_json_str(vec![ColumnDescriptor::other("x")], "[[1], [2], [3]]").unwrap();
        assert_eq!(result.len(), 3);
        assert!(matches!(
            MemoryResult::from_json_str(vec![], "[[1],"),
            Err(Error::Json(_))
        ));
    }
}
