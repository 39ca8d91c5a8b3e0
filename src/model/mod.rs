//! # Result Record Model
//!
//! DTOs for the cells a graph query result hands to the converter.
//! These types cross every boundary: cursor ↔ accumulators ↔ user.
//!
//! Design rule: NO tensor types, NO Arrow types here.
//! This module is pure data — no I/O, no state.

pub mod id;
pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;
pub mod json;

pub use id::InternalId;
pub use node::NodeRecord;
pub use relationship::RelRecord;
pub use value::Value;
pub use property_map::PropertyMap;
