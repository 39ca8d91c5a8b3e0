//! Ingestion of host result objects encoded as JSON.
//!
//! Hosts hand result rows over as plain dictionaries:
//!
//! ```text
//! node:         {"_label": "Person", "_id": {"table": 0, "offset": 3}, "age": 30}
//! relationship: {"_src": {"table": 0, "offset": 3}, "_dst": {"table": 1, "offset": 0}}
//! ```
//!
//! Keys starting with `_` are structural and never become properties.

use serde_json::Value as Json;

use super::{InternalId, NodeRecord, PropertyMap, RelRecord, Value};
use crate::{Error, Result};

const LABEL_KEY: &str = "_label";
const ID_KEY: &str = "_id";
const SRC_KEY: &str = "_src";
const DST_KEY: &str = "_dst";

impl Value {
    /// Convert a host JSON value into a typed cell.
    ///
    /// Objects shaped like nodes or relationships become graph cells; every
    /// other object becomes a `Map`.
    pub fn from_json(json: Json) -> Result<Value> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(
                items.into_iter().map(Value::from_json).collect::<Result<_>>()?,
            ),
            Json::Object(mut obj) => {
                if obj.contains_key(SRC_KEY) && obj.contains_key(DST_KEY) {
                    let src = parse_internal_id(obj.get(SRC_KEY))?;
                    let dst = parse_internal_id(obj.get(DST_KEY))?;
                    Value::Relationship(RelRecord { src, dst })
                } else if obj.contains_key(LABEL_KEY) && obj.contains_key(ID_KEY) {
                    let label = match obj.remove(LABEL_KEY) {
                        Some(Json::String(s)) => s,
                        other => return Err(type_error("string label", other.as_ref())),
                    };
                    let id = parse_internal_id(obj.remove(ID_KEY).as_ref())?;
                    let mut properties = PropertyMap::new();
                    for (key, val) in obj {
                        if key.starts_with('_') {
                            continue;
                        }
                        properties.insert(key, Value::from_json(val)?);
                    }
                    Value::Node(Box::new(NodeRecord { id, label, properties }))
                } else {
                    Value::Map(
                        obj.into_iter()
                            .map(|(k, v)| Ok::<_, Error>((k, Value::from_json(v)?)))
                            .collect::<Result<_>>()?,
                    )
                }
            }
        })
    }
}

fn parse_internal_id(json: Option<&Json>) -> Result<InternalId> {
    let table = json.and_then(|j| j.get("table")).and_then(Json::as_u64);
    let offset = json.and_then(|j| j.get("offset")).and_then(Json::as_u64);
    match (table, offset) {
        (Some(table), Some(offset)) => Ok(InternalId { table, offset }),
        _ => Err(type_error("internal id {table, offset}", json)),
    }
}

fn type_error(expected: &str, got: Option<&Json>) -> Error {
    Error::TypeError {
        expected: expected.into(),
        got: got.map_or_else(|| "nothing".to_string(), Json::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_object() {
        let v = Value::from_json(json!({
            "_label": "Person",
            "_id": {"table": 0, "offset": 3},
            "name": "Ada",
            "age": 36,
            "scores": [1.5, 2.0],
        }))
        .unwrap();
        let node = v.as_node().unwrap();
        assert_eq!(node.id, InternalId::new(0, 3));
        assert_eq!(node.label, "Person");
        assert_eq!(node.get("age"), &Value::Int(36));
        assert_eq!(node.get("scores"), &Value::List(vec![Value::Float(1.5), Value::Float(2.0)]));
        assert_eq!(node.properties.len(), 3);
    }

    #[test]
    fn test_rel_object() {
        let v = Value::from_json(json!({
            "_src": {"table": 0, "offset": 1},
            "_dst": {"table": 2, "offset": 5},
            "_label": "KNOWS",
            "_id": {"table": 4, "offset": 0},
        }))
        .unwrap();
        assert_eq!(v, Value::Relationship(RelRecord::new((0, 1), (2, 5))));
    }

    #[test]
    fn test_plain_object_is_map() {
        let v = Value::from_json(json!({"a": null, "b": true})).unwrap();
        match v {
            Value::Map(m) => {
                assert_eq!(m.get("a"), Some(&Value::Null));
                assert_eq!(m.get("b"), Some(&Value::Bool(true)));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_id_is_type_error() {
        let err = Value::from_json(json!({"_label": "Person", "_id": {"table": 0}})).unwrap_err();
        assert!(matches!(err, Error::TypeError { .. }));
    }
}
