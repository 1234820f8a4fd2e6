//! Vertex sets spanning two labels.

use quiver_core::{LabelId, VertexId};

use super::{BuildableColumn, Column, ColumnBuilder};

/// A column of vertices drawn from exactly two labels.
///
/// Scans over union types (e.g. `Person | Organisation`) produce this rather
/// than widening to a fully dynamic set. Each row carries a slot (0 or 1)
/// selecting which of the two labels the vertex belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoLabelVertexSet {
    labels: [LabelId; 2],
    vertices: Vec<VertexId>,
    slots: Vec<u8>,
}

impl TwoLabelVertexSet {
    /// Creates a two-label set.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is misaligned with `vertices` or contains a value
    /// other than 0 or 1.
    #[must_use]
    pub fn new(labels: [LabelId; 2], vertices: Vec<VertexId>, slots: Vec<u8>) -> Self {
        assert_eq!(vertices.len(), slots.len(), "label slots must be row-aligned");
        assert!(slots.iter().all(|&s| s < 2), "label slot out of range");
        Self { labels, vertices, slots }
    }

    /// Returns the two labels of this set.
    #[must_use]
    pub const fn labels(&self) -> [LabelId; 2] {
        self.labels
    }

    /// Returns the label of the vertex at `row`.
    #[must_use]
    pub fn label_of(&self, row: usize) -> LabelId {
        self.labels[self.slots[row] as usize]
    }

    /// Creates an empty builder for this label pair.
    #[must_use]
    pub fn builder(labels: [LabelId; 2]) -> TwoLabelVertexSetBuilder {
        TwoLabelVertexSetBuilder { labels, vertices: Vec::new(), slots: Vec::new() }
    }
}

impl Column for TwoLabelVertexSet {
    type Elem = VertexId;
    type Data = u8;

    fn len(&self) -> usize {
        self.vertices.len()
    }

    fn get(&self, row: usize) -> &VertexId {
        &self.vertices[row]
    }

    fn data(&self, row: usize) -> &u8 {
        &self.slots[row]
    }
}

impl BuildableColumn for TwoLabelVertexSet {
    type Builder = TwoLabelVertexSetBuilder;

    fn create_builder(&self) -> TwoLabelVertexSetBuilder {
        Self::builder(self.labels)
    }
}

/// Builder for [`TwoLabelVertexSet`].
#[derive(Debug)]
pub struct TwoLabelVertexSetBuilder {
    labels: [LabelId; 2],
    vertices: Vec<VertexId>,
    slots: Vec<u8>,
}

impl ColumnBuilder for TwoLabelVertexSetBuilder {
    type Output = TwoLabelVertexSet;

    fn insert(&mut self, elem: VertexId, slot: u8) {
        assert!(slot < 2, "label slot out of range");
        self.vertices.push(elem);
        self.slots.push(slot);
    }

    fn len(&self) -> usize {
        self.vertices.len()
    }

    fn build(self) -> TwoLabelVertexSet {
        TwoLabelVertexSet { labels: self.labels, vertices: self.vertices, slots: self.slots }
    }
}
