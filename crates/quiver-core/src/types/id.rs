//! Identifier newtypes.
//!
//! Vertices, labels, and context columns are all addressed by small integer
//! identifiers. Wrapping them in newtypes keeps the different id spaces from
//! being mixed up at compile time.

use serde::{Deserialize, Serialize};

/// A unique identifier for a vertex.
///
/// Vertex ids are dense per label: a property column for a label is indexed
/// directly by the vertex id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(u64);

impl VertexId {
    /// Creates a new vertex ID from a raw u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value of this ID.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns this id as a usize, for indexing property columns.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<VertexId> for u64 {
    fn from(id: VertexId) -> Self {
        id.0
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A unique identifier for a vertex or edge label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabelId(u16);

impl LabelId {
    /// Creates a new label ID from a raw u16 value.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw u16 value of this ID.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for LabelId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "label({})", self.0)
    }
}

/// A column identifier within an execution context.
///
/// Tags number the columns of a context left to right. A context carries a
/// `base_tag`; the tag of a column is `base_tag + position`, where the
/// position is fixed at compile time by the context's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag(u32);

impl Tag {
    /// Creates a new tag from a raw u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw u32 value of this tag.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the tag `offset` positions to the right of this one.
    #[must_use]
    pub const fn offset(self, offset: u32) -> Self {
        Self(self.0 + offset)
    }
}

impl From<u32> for Tag {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
