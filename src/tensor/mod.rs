//! # Tensors
//!
//! Dense, row-major, typed numeric arrays. This is the column-buffer target
//! the converter writes into; it knows nothing about graphs.

pub mod coerce;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::schema::ScalarKind;

pub use coerce::{CoerceError, Coercion};

/// Tensor shape. Graph-learning features rarely exceed four dimensions.
pub type Shape = SmallVec<[usize; 4]>;

/// Flat element storage of a tensor, one variant per supported scalar kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values")]
pub enum TensorData {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

impl TensorData {
    /// Empty storage for `kind`; `None` for kinds a tensor cannot hold.
    pub fn empty(kind: ScalarKind) -> Option<Self> {
        match kind {
            ScalarKind::Int64 => Some(TensorData::Int64(Vec::new())),
            ScalarKind::Double => Some(TensorData::Float64(Vec::new())),
            ScalarKind::Bool => Some(TensorData::Bool(Vec::new())),
            ScalarKind::Unsupported => None,
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            TensorData::Int64(_) => ScalarKind::Int64,
            TensorData::Float64(_) => ScalarKind::Double,
            TensorData::Bool(_) => ScalarKind::Bool,
        }
    }

    pub fn dtype_name(&self) -> &'static str {
        match self {
            TensorData::Int64(_) => "int64",
            TensorData::Float64(_) => "float64",
            TensorData::Bool(_) => "bool",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::Int64(v) => v.len(),
            TensorData::Float64(v) => v.len(),
            TensorData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `other`'s elements. Returns `false` (and appends nothing) on a
    /// kind mismatch.
    pub fn append(&mut self, other: &mut TensorData) -> bool {
        match (self, other) {
            (TensorData::Int64(a), TensorData::Int64(b)) => a.append(b),
            (TensorData::Float64(a), TensorData::Float64(b)) => a.append(b),
            (TensorData::Bool(a), TensorData::Bool(b)) => a.append(b),
            _ => return false,
        }
        true
    }
}

/// A dense typed tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    shape: Shape,
    data: TensorData,
}

impl Tensor {
    /// Build a tensor, checking that the element count matches the shape.
    pub fn new(shape: impl Into<Shape>, data: TensorData) -> Option<Self> {
        let shape = shape.into();
        if shape.iter().product::<usize>() != data.len() {
            return None;
        }
        Some(Self { shape, data })
    }

    /// `count` equally shaped entries stacked along a new leading dimension.
    /// `data` must hold exactly `count * product(element_shape)` elements.
    pub(crate) fn stack(count: usize, element_shape: &[usize], data: TensorData) -> Self {
        let mut shape = Shape::with_capacity(element_shape.len() + 1);
        shape.push(count);
        shape.extend_from_slice(element_shape);
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    /// A `(2, E)` edge-index tensor: row 0 holds sources, row 1 destinations.
    pub fn edge_index(pairs: &[(usize, usize)]) -> Self {
        let mut values = Vec::with_capacity(pairs.len() * 2);
        values.extend(pairs.iter().map(|&(src, _)| src as i64));
        values.extend(pairs.iter().map(|&(_, dst)| dst as i64));
        Self {
            shape: SmallVec::from_slice(&[2, pairs.len()]),
            data: TensorData::Int64(values),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn kind(&self) -> ScalarKind {
        self.data.kind()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn into_data(self) -> TensorData {
        self.data
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            TensorData::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            TensorData::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match &self.data {
            TensorData::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Number of elements in one slice along the leading dimension.
    pub fn row_stride(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Row `i` of an `(2, E)` or `(N, ...)` integer tensor.
    pub fn row_i64(&self, i: usize) -> Option<&[i64]> {
        let stride = self.row_stride();
        let values = self.as_i64()?;
        values.get(i * stride..(i + 1) * stride)
    }
}
