//! The boundary between the execution core and graph storage.
//!
//! Operators never see storage pages or serialized tuples. They ask a
//! [`GraphAccessor`] for a typed [`PropertyColumn`] up front and then index
//! it by vertex id during the scan. Resolution failures (unknown property,
//! wrong type) surface before the first row is touched.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use quiver_core::{LabelId, PropertyValue, VertexId};

use crate::error::{ExecError, ExecResult};

/// A zero-copy, typed view over one property of one vertex label.
///
/// Vertex ids are dense per label, so the column is a plain slice indexed by
/// id. Cloning is cheap: the backing storage is shared.
#[derive(Debug, Clone)]
pub struct PropertyColumn<T> {
    values: Arc<[T]>,
}

impl<T: PropertyValue> PropertyColumn<T> {
    /// Creates a column from the given values, indexed by vertex id.
    #[must_use]
    pub fn new(values: impl Into<Arc<[T]>>) -> Self {
        Self { values: values.into() }
    }

    /// Returns the property value for `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range for the label's vertex table.
    /// Vertex sets only hold ids the storage layer produced, so an
    /// out-of-range id is an engine bug.
    #[must_use]
    pub fn get(&self, vertex: VertexId) -> &T {
        &self.values[vertex.as_usize()]
    }

    /// Returns the number of vertices covered by this column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column covers no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Read access to vertex properties.
///
/// Implementations must be deterministic and side-effect free: the same
/// `(label, property)` pair always resolves to the same column for the
/// lifetime of the accessor.
pub trait GraphAccessor {
    /// Resolves the property column for `property` on vertices of `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::UnknownProperty`] if the label has no such
    /// property, or [`ExecError::PropertyType`] if it exists with a
    /// different value type than `T`.
    fn vertex_property<T: PropertyValue>(
        &self,
        label: LabelId,
        property: &str,
    ) -> ExecResult<PropertyColumn<T>>;
}

/// A graph accessor with no properties at all.
///
/// Useful for plans that only aggregate over identity projections, and for
/// tests that must not touch property storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGraph;

impl NullGraph {
    /// Creates a new null graph accessor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GraphAccessor for NullGraph {
    fn vertex_property<T: PropertyValue>(
        &self,
        label: LabelId,
        property: &str,
    ) -> ExecResult<PropertyColumn<T>> {
        Err(ExecError::UnknownProperty { label, property: property.to_owned() })
    }
}

/// An in-memory graph accessor backed by typed property columns.
///
/// Columns are stored type-erased and recovered by downcast at lookup time,
/// so one graph can hold properties of different value types side by side.
#[derive(Default)]
pub struct MemoryGraph {
    columns: HashMap<(LabelId, String), Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph").field("columns", &self.columns.keys()).finish()
    }
}

impl MemoryGraph {
    /// Creates an empty in-memory graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property column for `label`, indexed by vertex id.
    #[must_use]
    pub fn with_vertex_property<T: PropertyValue>(
        mut self,
        label: LabelId,
        property: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        let column = PropertyColumn::new(values);
        self.columns.insert((label, property.into()), Box::new(column));
        self
    }
}

impl GraphAccessor for MemoryGraph {
    fn vertex_property<T: PropertyValue>(
        &self,
        label: LabelId,
        property: &str,
    ) -> ExecResult<PropertyColumn<T>> {
        let stored = self.columns.get(&(label, property.to_owned())).ok_or_else(|| {
            ExecError::UnknownProperty { label, property: property.to_owned() }
        })?;
        let column = stored.downcast_ref::<PropertyColumn<T>>().ok_or_else(|| {
            ExecError::PropertyType { label, property: property.to_owned() }
        })?;
        Ok(column.clone())
    }
}
