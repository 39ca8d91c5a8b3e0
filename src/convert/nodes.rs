//! Node accumulation: deduplication, property extraction and columnar
//! storage per label.
//!
//! Labels are interned into a dense arena (`LabelId` → `LabelState`), and
//! each label keeps one column slot per schema descriptor. Ignoring a
//! property clears its slot, so a column either covers every position of
//! its label or does not exist at all.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use super::{ConverterConfig, NullPolicy, WarningLog};
use crate::model::{InternalId, NodeRecord, Value};
use crate::schema::{LabelSchema, PropertyDescriptor, PropertySchemaCache, SchemaSource};
use crate::tensor::{CoerceError, Coercion, Shape, Tensor, TensorData};
use crate::Result;

/// Dense index of an interned label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub(crate) u32);

impl LabelId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Columns
// ============================================================================

/// One property's values across the positions of a label, stored flat.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    element_shape: Shape,
    data: TensorData,
    len: usize,
}

impl Column {
    fn start(element_shape: Shape, data: TensorData) -> Self {
        Self { element_shape, data, len: 1 }
    }

    fn push(&mut self, mut data: TensorData) {
        let appended = self.data.append(&mut data);
        debug_assert!(appended, "column kind is fixed by the schema");
        self.len += 1;
    }

    /// Shape of one entry; empty for scalar properties.
    pub fn element_shape(&self) -> &[usize] {
        &self.element_shape
    }

    /// Number of entries (positions) in the column.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Stack entries along a new leading dimension.
    pub fn into_tensor(self) -> Tensor {
        Tensor::stack(self.len, &self.element_shape, self.data)
    }
}

// ============================================================================
// Per-label state
// ============================================================================

/// Accumulated columns and primary keys of one label.
#[derive(Debug, Clone)]
pub struct LabelState {
    name: String,
    schema: Arc<LabelSchema>,
    columns: Vec<Option<Column>>,
    ignored: Vec<bool>,
    primary_keys: Vec<Value>,
}

impl LabelState {
    fn new(name: &str, schema: Arc<LabelSchema>) -> Self {
        let slots = schema.len();
        Self {
            name: name.to_string(),
            schema,
            columns: vec![None; slots],
            ignored: vec![false; slots],
            primary_keys: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &LabelSchema {
        &self.schema
    }

    /// Number of positions assigned so far.
    pub fn count(&self) -> usize {
        self.primary_keys.len()
    }

    /// Primary-key value per position.
    pub fn primary_keys(&self) -> &[Value] {
        &self.primary_keys
    }

    pub fn into_primary_keys(self) -> Vec<Value> {
        self.primary_keys
    }

    /// Whether any property column survived.
    pub fn has_data(&self) -> bool {
        self.columns.iter().any(Option::is_some)
    }

    pub fn is_ignored(&self, property: &str) -> bool {
        self.schema
            .properties
            .iter()
            .position(|p| p.name == property)
            .is_some_and(|slot| self.ignored[slot])
    }

    pub fn column(&self, property: &str) -> Option<&Column> {
        let slot = self.schema.properties.iter().position(|p| p.name == property)?;
        self.columns[slot].as_ref()
    }

    /// Surviving columns in schema order.
    pub fn columns(&self) -> impl Iterator<Item = (&PropertyDescriptor, &Column)> {
        self.schema
            .properties
            .iter()
            .zip(&self.columns)
            .filter_map(|(desc, col)| col.as_ref().map(|c| (desc, c)))
    }

    /// Split into surviving `(property name, column)` pairs and primary keys.
    pub fn into_parts(self) -> (String, Vec<(String, Column)>, Vec<Value>) {
        let columns = self
            .schema
            .properties
            .iter()
            .zip(self.columns)
            .filter_map(|(desc, col)| col.map(|c| (desc.name.clone(), c)))
            .collect();
        (self.name, columns, self.primary_keys)
    }

    /// Mark a property ignored for the rest of the conversion and drop
    /// whatever was already collected for it.
    fn ignore(&mut self, slot: usize) {
        self.ignored[slot] = true;
        if self.columns[slot].take().is_some() {
            tracing::debug!(label = %self.name, property = %self.schema.properties[slot].name, "discarded partial column");
        }
    }
}

// ============================================================================
// NodeAccumulator
// ============================================================================

fn coercion_warning(label: &str, desc: &PropertyDescriptor, err: &CoerceError) -> String {
    let prop = desc.name.as_str();
    match err {
        CoerceError::Element { got, .. } => format!(
            "Property {label}.{prop} has a value of type {got} that does not match its declared type {}. The property is ignored.",
            desc.type_name,
        ),
        CoerceError::NotAList { depth: 0, got } => format!(
            "Property {label}.{prop} is declared as a list but has a value of type {got}. The property is ignored.",
        ),
        CoerceError::NotAList { .. } | CoerceError::Irregular { .. } => format!(
            "Property {label}.{prop} cannot be converted to a tensor (likely due to nested lists of variable length). The property is ignored.",
        ),
        CoerceError::Unsupported(_) => format!(
            "Property {label}.{prop} of type {} is not supported. The property is ignored.",
            desc.type_name,
        ),
    }
}

/// Result of observing one node cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// First occurrence, placed at this position of its label.
    Placed(usize),
    /// Already seen; nothing changed.
    Duplicate,
    /// First occurrence, rejected without a position.
    Rejected,
}

/// Deduplicates node occurrences and columnarizes their properties.
#[derive(Debug)]
pub struct NodeAccumulator {
    config: ConverterConfig,
    label_ids: HashMap<String, LabelId>,
    labels: Vec<LabelState>,
    positions: HashMap<InternalId, usize>,
    rejected: HashSet<InternalId>,
    table_labels: HashMap<u64, LabelId>,
}

impl NodeAccumulator {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            label_ids: HashMap::new(),
            labels: Vec::new(),
            positions: HashMap::new(),
            rejected: HashSet::new(),
            table_labels: HashMap::new(),
        }
    }

    /// Observe a node cell. The first occurrence of an internal id decides;
    /// later ones are no-ops.
    pub fn observe<S: SchemaSource + ?Sized>(
        &mut self,
        node: &NodeRecord,
        cache: &mut PropertySchemaCache,
        source: &S,
        warnings: &mut WarningLog,
    ) -> Result<Observed> {
        let label_id = self.intern(&node.label, cache, source)?;
        self.table_labels.insert(node.id.table, label_id);

        if self.positions.contains_key(&node.id) || self.rejected.contains(&node.id) {
            return Ok(Observed::Duplicate);
        }

        let state = &mut self.labels[label_id.index()];
        let schema = Arc::clone(&state.schema);
        let label = node.label.as_str();
        let mut staged: Vec<(usize, Shape, TensorData)> = Vec::with_capacity(schema.len());
        let mut primary_key = Value::Null;

        for (slot, desc) in schema.properties.iter().enumerate() {
            if state.ignored[slot] {
                continue;
            }
            let raw = node.get(&desc.name);
            if desc.is_primary_key {
                primary_key = raw.clone();
                continue;
            }
            let prop = desc.name.as_str();

            if !desc.kind.is_supported() {
                warnings.push(format!(
                    "Property {label}.{prop} of type {} is not supported. The property is ignored.",
                    desc.type_name,
                ));
                state.ignore(slot);
                continue;
            }

            if raw.is_null() {
                match self.config.null_values {
                    NullPolicy::IgnoreProperty => {
                        warnings.push(format!(
                            "Property {label}.{prop} has a null value. Null values are not supported. The property is ignored.",
                        ));
                        state.ignore(slot);
                        continue;
                    }
                    NullPolicy::SkipNode => {
                        warnings.push(format!(
                            "Property {label}.{prop} has a null value. Nodes with null values are skipped.",
                        ));
                        self.rejected.insert(node.id);
                        return Ok(Observed::Rejected);
                    }
                }
            }

            let mut coercion = Coercion::new(desc.kind, desc.list_dims);
            if !self.config.strict_scalars {
                coercion = coercion.lenient();
            }
            let (shape, data) = match coercion.apply(raw) {
                Ok(coerced) => coerced,
                Err(err) => {
                    tracing::debug!(label, property = prop, id = %node.id, %err, "coercion failed");
                    warnings.push(coercion_warning(label, desc, &err));
                    state.ignore(slot);
                    continue;
                }
            };

            let consistent = state.columns[slot]
                .as_ref()
                .is_none_or(|column| column.element_shape() == shape.as_slice());
            if !consistent {
                warnings.push(format!(
                    "Property {label}.{prop} has an inconsistent shape. The property is ignored.",
                ));
                state.ignore(slot);
                continue;
            }

            staged.push((slot, shape, data));
        }

        let position = state.count();
        for (slot, shape, data) in staged {
            match &mut state.columns[slot] {
                Some(column) => column.push(data),
                empty => *empty = Some(Column::start(shape, data)),
            }
        }
        state.primary_keys.push(primary_key);
        debug_assert!(state.columns().all(|(_, c)| c.len() == position + 1));

        self.positions.insert(node.id, position);
        Ok(Observed::Placed(position))
    }

    fn intern<S: SchemaSource + ?Sized>(
        &mut self,
        label: &str,
        cache: &mut PropertySchemaCache,
        source: &S,
    ) -> Result<LabelId> {
        if let Some(&id) = self.label_ids.get(label) {
            return Ok(id);
        }
        let schema = cache.get(source, label)?;
        let id = LabelId(self.labels.len() as u32);
        self.labels.push(LabelState::new(label, schema));
        self.label_ids.insert(label.to_string(), id);
        Ok(id)
    }

    /// Label and position of a placed node.
    pub fn position(&self, id: InternalId) -> Option<(LabelId, usize)> {
        let pos = *self.positions.get(&id)?;
        let label = *self.table_labels.get(&id.table)?;
        Some((label, pos))
    }

    /// Label last seen for a node table, placed or not.
    pub fn table_label(&self, table: u64) -> Option<&str> {
        self.table_labels.get(&table).map(|&id| self.labels[id.index()].name())
    }

    pub fn label_id(&self, label: &str) -> Option<LabelId> {
        self.label_ids.get(label).copied()
    }

    pub fn label(&self, id: LabelId) -> Option<&LabelState> {
        self.labels.get(id.index())
    }

    pub fn get(&self, label: &str) -> Option<&LabelState> {
        self.label_id(label).and_then(|id| self.label(id))
    }

    /// Labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = (LabelId, &LabelState)> {
        self.labels.iter().enumerate().map(|(i, s)| (LabelId(i as u32), s))
    }

    pub fn into_labels(self) -> Vec<LabelState> {
        self.labels
    }

    pub fn placed(&self) -> usize {
        self.positions.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejected.len()
    }
}
