//! Single-label vertex sets.

use quiver_core::{LabelId, VertexId};

use super::{BuildableColumn, Column, ColumnBuilder};

/// A column of vertices that all share one label.
///
/// The optional payload `D` travels row-aligned with the vertex ids; path
/// expansions use it to carry accumulated state, plain scans leave it `()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexSet<D = ()> {
    label: LabelId,
    vertices: Vec<VertexId>,
    data: Vec<D>,
}

impl<D: Clone> VertexSet<D> {
    /// Creates a vertex set with a payload for every row.
    ///
    /// # Panics
    ///
    /// Panics if `vertices` and `data` have different lengths.
    #[must_use]
    pub fn with_data(label: LabelId, vertices: Vec<VertexId>, data: Vec<D>) -> Self {
        assert_eq!(vertices.len(), data.len(), "vertex set payload must be row-aligned");
        Self { label, vertices, data }
    }

    /// Returns the label shared by every vertex in this set.
    #[must_use]
    pub const fn label(&self) -> LabelId {
        self.label
    }

    /// Iterates over the vertex ids in row order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().copied()
    }

    /// Creates an empty builder for this label.
    #[must_use]
    pub fn builder(label: LabelId) -> VertexSetBuilder<D> {
        VertexSetBuilder { label, vertices: Vec::new(), data: Vec::new() }
    }
}

impl VertexSet<()> {
    /// Creates a payload-free vertex set.
    #[must_use]
    pub fn new(label: LabelId, vertices: Vec<VertexId>) -> Self {
        let data = vec![(); vertices.len()];
        Self { label, vertices, data }
    }
}

impl<D: Clone> Column for VertexSet<D> {
    type Elem = VertexId;
    type Data = D;

    fn len(&self) -> usize {
        self.vertices.len()
    }

    fn get(&self, row: usize) -> &VertexId {
        &self.vertices[row]
    }

    fn data(&self, row: usize) -> &D {
        &self.data[row]
    }
}

impl<D: Clone> BuildableColumn for VertexSet<D> {
    type Builder = VertexSetBuilder<D>;

    fn create_builder(&self) -> VertexSetBuilder<D> {
        VertexSet::builder(self.label)
    }
}

/// Builder for [`VertexSet`].
#[derive(Debug)]
pub struct VertexSetBuilder<D = ()> {
    label: LabelId,
    vertices: Vec<VertexId>,
    data: Vec<D>,
}

impl<D: Clone> ColumnBuilder for VertexSetBuilder<D> {
    type Output = VertexSet<D>;

    fn insert(&mut self, elem: VertexId, data: D) {
        self.vertices.push(elem);
        self.data.push(data);
    }

    fn len(&self) -> usize {
        self.vertices.len()
    }

    fn build(self) -> VertexSet<D> {
        VertexSet { label: self.label, vertices: self.vertices, data: self.data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: LabelId = LabelId::new(0);

    fn ids(raw: &[u64]) -> Vec<VertexId> {
        raw.iter().copied().map(VertexId::new).collect()
    }

    #[test]
    fn vertex_set_rows() {
        let set = VertexSet::new(PERSON, ids(&[3, 1, 4]));
        assert_eq!(set.len(), 3);
        assert_eq!(*set.get(1), VertexId::new(1));
        assert_eq!(set.label(), PERSON);
        assert_eq!(set.iter().collect::<Vec<_>>(), ids(&[3, 1, 4]));
    }

    #[test]
    fn builder_preserves_insertion_order() {
        let mut builder = VertexSet::<()>::builder(PERSON);
        builder.insert(VertexId::new(7), ());
        builder.insert(VertexId::new(2), ());
        let set = builder.build();
        assert_eq!(set.iter().collect::<Vec<_>>(), ids(&[7, 2]));
    }

    #[test]
    fn payload_travels_with_rows() {
        let set = VertexSet::with_data(PERSON, ids(&[5, 6]), vec![10i64, 20]);
        assert_eq!(*set.data(0), 10);
        assert_eq!(*set.data(1), 20);
    }

    #[test]
    fn create_builder_keeps_label() {
        let set = VertexSet::new(PERSON, ids(&[1]));
        let builder = set.create_builder();
        assert!(builder.is_empty());
        assert_eq!(builder.build().label(), PERSON);
    }

    #[test]
    #[should_panic(expected = "row-aligned")]
    fn misaligned_payload_panics() {
        let _ = VertexSet::with_data(PERSON, ids(&[1, 2]), vec![0i64]);
    }
}
