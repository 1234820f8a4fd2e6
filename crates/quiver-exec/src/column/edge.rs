//! Single-triplet edge sets.

use quiver_core::{LabelId, VertexId};

use super::{BuildableColumn, Column, ColumnBuilder};

/// One edge, as stored in an [`EdgeSet`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    /// The source vertex.
    pub src: VertexId,
    /// The destination vertex.
    pub dst: VertexId,
}

impl Edge {
    /// Creates an edge between `src` and `dst`.
    #[must_use]
    pub const fn new(src: VertexId, dst: VertexId) -> Self {
        Self { src, dst }
    }
}

/// A column of edges that all share one (src label, edge label, dst label)
/// triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSet {
    src_label: LabelId,
    edge_label: LabelId,
    dst_label: LabelId,
    edges: Vec<Edge>,
}

impl EdgeSet {
    /// Creates an edge set for the given label triplet.
    #[must_use]
    pub fn new(
        src_label: LabelId,
        edge_label: LabelId,
        dst_label: LabelId,
        edges: Vec<Edge>,
    ) -> Self {
        Self { src_label, edge_label, dst_label, edges }
    }

    /// Returns the source vertex label.
    #[must_use]
    pub const fn src_label(&self) -> LabelId {
        self.src_label
    }

    /// Returns the edge label.
    #[must_use]
    pub const fn edge_label(&self) -> LabelId {
        self.edge_label
    }

    /// Returns the destination vertex label.
    #[must_use]
    pub const fn dst_label(&self) -> LabelId {
        self.dst_label
    }

    /// Iterates over the edges in row order.
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Creates an empty builder for this label triplet.
    #[must_use]
    pub fn builder(src_label: LabelId, edge_label: LabelId, dst_label: LabelId) -> EdgeSetBuilder {
        EdgeSetBuilder { src_label, edge_label, dst_label, edges: Vec::new() }
    }
}

impl Column for EdgeSet {
    type Elem = Edge;
    type Data = ();

    fn len(&self) -> usize {
        self.edges.len()
    }

    fn get(&self, row: usize) -> &Edge {
        &self.edges[row]
    }

    fn data(&self, _row: usize) -> &() {
        &()
    }
}

impl BuildableColumn for EdgeSet {
    type Builder = EdgeSetBuilder;

    fn create_builder(&self) -> EdgeSetBuilder {
        Self::builder(self.src_label, self.edge_label, self.dst_label)
    }
}

/// Builder for [`EdgeSet`].
#[derive(Debug)]
pub struct EdgeSetBuilder {
    src_label: LabelId,
    edge_label: LabelId,
    dst_label: LabelId,
    edges: Vec<Edge>,
}

impl ColumnBuilder for EdgeSetBuilder {
    type Output = EdgeSet;

    fn insert(&mut self, elem: Edge, _data: ()) {
        self.edges.push(elem);
    }

    fn len(&self) -> usize {
        self.edges.len()
    }

    fn build(self) -> EdgeSet {
        EdgeSet {
            src_label: self.src_label,
            edge_label: self.edge_label,
            dst_label: self.dst_label,
            edges: self.edges,
        }
    }
}
