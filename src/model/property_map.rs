//! PropertyMap — the raw key-value payload of a node record.

use std::collections::HashMap;
use super::Value;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;
