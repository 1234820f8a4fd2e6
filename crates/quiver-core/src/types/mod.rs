//! Fundamental type definitions.

mod id;
mod property;

pub use id::{LabelId, Tag, VertexId};
pub use property::PropertyValue;
