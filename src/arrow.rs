//! Arrow export of tensor graphs (feature `arrow-results`).
//!
//! ```text
//! NodeStore  → RecordBatch, one column per property (list-valued
//!              properties become nested FixedSizeList columns)
//! EdgeStore  → RecordBatch { src: Int64, dst: Int64 }
//! ```

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, BooleanArray, FixedSizeListArray, Float64Array, Int64Array, RecordBatch,
    RecordBatchOptions,
};
use arrow_buffer::NullBuffer;
use arrow_schema::{ArrowError, DataType, Field, Schema};

use crate::graph::{EdgeStore, GraphData, NodeStore};
use crate::tensor::{Tensor, TensorData};
use crate::Result;

impl Tensor {
    /// One Arrow array with one slot per entry along the leading dimension.
    ///
    /// A zero-width list level carries no child values, so its slot count
    /// comes from an all-valid null buffer sized to the outer dimensions.
    pub fn to_arrow(&self) -> Result<ArrayRef> {
        let mut array: ArrayRef = match self.data() {
            TensorData::Int64(v) => Arc::new(Int64Array::from(v.clone())) as ArrayRef,
            TensorData::Float64(v) => Arc::new(Float64Array::from(v.clone())),
            TensorData::Bool(v) => Arc::new(BooleanArray::from(v.clone())),
        };
        let shape = self.shape();
        for level in (1..shape.len()).rev() {
            let dim = shape[level];
            let size = i32::try_from(dim).map_err(|_| {
                ArrowError::InvalidArgumentError(format!("dimension {dim} exceeds i32"))
            })?;
            let nulls = (dim == 0).then(|| NullBuffer::new_valid(shape[..level].iter().product()));
            let item = Arc::new(Field::new("item", array.data_type().clone(), false));
            array = Arc::new(FixedSizeListArray::try_new(item, size, array, nulls)?) as ArrayRef;
        }
        Ok(array)
    }
}

impl NodeStore {
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(self.properties.len());
        let mut columns = Vec::with_capacity(self.properties.len());
        for (name, tensor) in &self.properties {
            let array = tensor.to_arrow()?;
            fields.push(Field::new(name, array.data_type().clone(), false));
            columns.push(array);
        }
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_nodes));
        Ok(RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?)
    }
}

impl EdgeStore {
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        edge_batch(&self.edge_index)
    }
}

impl GraphData {
    /// Node properties as one batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        self.nodes.to_record_batch()
    }

    /// Edge index as a `{src, dst}` batch, if the graph has edges.
    pub fn edges_to_record_batch(&self) -> Result<Option<RecordBatch>> {
        self.edge_index.as_ref().map(edge_batch).transpose()
    }
}

fn edge_batch(edge_index: &Tensor) -> Result<RecordBatch> {
    let src = edge_index.row_i64(0).unwrap_or_default().to_vec();
    let dst = edge_index.row_i64(1).unwrap_or_default().to_vec();
    let schema = Schema::new(vec![
        Field::new("src", DataType::Int64, false),
        Field::new("dst", DataType::Int64, false),
    ]);
    let columns: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(src)), Arc::new(Int64Array::from(dst))];
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
