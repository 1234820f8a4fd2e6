//! Core types for the Quiver graph query engine.
//!
//! This crate provides the fundamental types shared by every layer of the
//! engine:
//!
//! - [`VertexId`] / [`LabelId`]: graph entity identifiers
//! - [`Tag`]: column identifiers within an execution context
//! - [`PropertyValue`]: the typed universe of graph property values

pub mod types;

pub use types::{LabelId, PropertyValue, Tag, VertexId};
