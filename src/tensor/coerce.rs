//! Coercion of raw cell values into typed tensor elements.

use smallvec::SmallVec;

use super::{Shape, TensorData};
use crate::model::Value;
use crate::schema::ScalarKind;

/// Why a value could not become tensor data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("{0:?} values cannot be stored in a tensor")]
    Unsupported(ScalarKind),

    #[error("expected a list at depth {depth}, got {got}")]
    NotAList { depth: usize, got: &'static str },

    #[error("nested list of variable length at depth {depth}: expected {expected}, got {found}")]
    Irregular { depth: usize, expected: usize, found: usize },

    #[error("expected {expected:?} element, got {got}")]
    Element { expected: ScalarKind, got: &'static str },
}

/// Coercion rules for one declared property.
///
/// Strict mode accepts only exact matches, with integers widening to
/// DOUBLE. Lenient mode also takes integral floats as INT64 and 0/1
/// integers as BOOL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coercion {
    pub kind: ScalarKind,
    pub list_dims: usize,
    pub strict: bool,
}

impl Coercion {
    pub fn new(kind: ScalarKind, list_dims: usize) -> Self {
        Self { kind, list_dims, strict: true }
    }

    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Coerce `value` into a tensor element shape plus flat data.
    ///
    /// Scalars (`list_dims == 0`) come back with an empty shape and one
    /// element. Nested lists must be regular: every list at a given depth
    /// has the same length as the first one seen at that depth.
    pub fn apply(&self, value: &Value) -> Result<(Shape, TensorData), CoerceError> {
        let mut data = TensorData::empty(self.kind).ok_or(CoerceError::Unsupported(self.kind))?;
        let shape = infer_shape(value, self.list_dims)?;
        self.flatten(value, &shape, 0, &mut data)?;
        Ok((shape, data))
    }

    fn flatten(
        &self,
        value: &Value,
        shape: &[usize],
        depth: usize,
        out: &mut TensorData,
    ) -> Result<(), CoerceError> {
        let Some((&expected, rest)) = shape.split_first() else {
            return self.push_scalar(value, out);
        };
        let items = match value {
            Value::List(items) => items,
            other => return Err(CoerceError::NotAList { depth, got: other.type_name() }),
        };
        if items.len() != expected {
            return Err(CoerceError::Irregular { depth, expected, found: items.len() });
        }
        for item in items {
            self.flatten(item, rest, depth + 1, out)?;
        }
        Ok(())
    }

    fn push_scalar(&self, value: &Value, out: &mut TensorData) -> Result<(), CoerceError> {
        let mismatch = || CoerceError::Element { expected: self.kind, got: value.type_name() };
        match out {
            TensorData::Int64(v) => {
                let x = match value {
                    Value::Int(i) => *i,
                    Value::Float(f) if !self.strict && f.fract() == 0.0 && f.is_finite() => *f as i64,
                    _ => return Err(mismatch()),
                };
                v.push(x);
            }
            TensorData::Float64(v) => v.push(value.as_float().ok_or_else(mismatch)?),
            TensorData::Bool(v) => {
                let b = match value {
                    Value::Bool(b) => *b,
                    Value::Int(i @ (0 | 1)) if !self.strict => *i == 1,
                    _ => return Err(mismatch()),
                };
                v.push(b);
            }
        }
        Ok(())
    }
}

/// Shape of a `dims`-deep nested list, read off the first element at each
/// depth. An empty list zero-fills the remaining dimensions.
fn infer_shape(value: &Value, dims: usize) -> Result<Shape, CoerceError> {
    let mut shape: Shape = SmallVec::with_capacity(dims);
    let mut current = value;
    for depth in 0..dims {
        let items = match current {
            Value::List(items) => items,
            other => return Err(CoerceError::NotAList { depth, got: other.type_name() }),
        };
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => {
                shape.resize(dims, 0);
                break;
            }
        }
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    #[test]
    fn test_scalar_coercion() {
        let (shape, data) = Coercion::new(ScalarKind::Int64, 0).apply(&Value::Int(7)).unwrap();
        assert!(shape.is_empty());
        assert_eq!(data, TensorData::Int64(vec![7]));

        let (_, data) = Coercion::new(ScalarKind::Double, 0).apply(&Value::Int(2)).unwrap();
        assert_eq!(data, TensorData::Float64(vec![2.0]));
    }

    #[test]
    fn test_strict_rejects_mismatched_scalar() {
        let err = Coercion::new(ScalarKind::Int64, 0).apply(&Value::Float(1.0)).unwrap_err();
        assert_eq!(err, CoerceError::Element { expected: ScalarKind::Int64, got: "DOUBLE" });
        assert!(Coercion::new(ScalarKind::Bool, 0).apply(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_lenient_accepts_integral_float_and_bit() {
        let c = Coercion::new(ScalarKind::Int64, 0).lenient();
        assert_eq!(c.apply(&Value::Float(4.0)).unwrap().1, TensorData::Int64(vec![4]));
        assert!(c.apply(&Value::Float(4.5)).is_err());

        let c = Coercion::new(ScalarKind::Bool, 0).lenient();
        assert_eq!(c.apply(&Value::Int(0)).unwrap().1, TensorData::Bool(vec![false]));
        assert!(c.apply(&Value::Int(2)).is_err());
    }

    #[test]
    fn test_regular_matrix() {
        let v = list(vec![
            list(vec![Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)]),
            list(vec![Value::Float(4.0), Value::Float(5.0), Value::Float(6.0)]),
        ]);
        let (shape, data) = Coercion::new(ScalarKind::Double, 2).apply(&v).unwrap();
        assert_eq!(shape.as_slice(), &[2, 3]);
        assert_eq!(data, TensorData::Float64(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_irregular_nesting_fails() {
        let v = list(vec![
            list(vec![Value::Int(1), Value::Int(2)]),
            list(vec![Value::Int(3)]),
        ]);
        let err = Coercion::new(ScalarKind::Int64, 2).apply(&v).unwrap_err();
        assert_eq!(err, CoerceError::Irregular { depth: 1, expected: 2, found: 1 });
    }

    #[test]
    fn test_null_element_fails() {
        let v = list(vec![Value::Int(1), Value::Null]);
        assert!(matches!(
            Coercion::new(ScalarKind::Int64, 1).apply(&v),
            Err(CoerceError::Element { got: "NULL", .. })
        ));
    }

    #[test]
    fn test_scalar_where_list_declared() {
        let err = Coercion::new(ScalarKind::Bool, 1).apply(&Value::Bool(true)).unwrap_err();
        assert_eq!(err, CoerceError::NotAList { depth: 0, got: "BOOL" });
    }

    #[test]
    fn test_empty_list_zero_fills_shape() {
        let (shape, data) = Coercion::new(ScalarKind::Int64, 2).apply(&list(vec![])).unwrap();
        assert_eq!(shape.as_slice(), &[0, 0]);
        assert!(data.is_empty());
    }

    #[test]
    fn test_unsupported_kind() {
        let err = Coercion::new(ScalarKind::Unsupported, 0).apply(&Value::from("x")).unwrap_err();
        assert_eq!(err, CoerceError::Unsupported(ScalarKind::Unsupported));
    }
}
