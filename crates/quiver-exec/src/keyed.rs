//! Keyed sets: columns with a dedup index.
//!
//! A keyed builder assigns every inserted element a group index. The first
//! occurrence of an element gets the next free index (so indices follow
//! strict first-seen order, starting at 0); later occurrences get the index
//! already assigned. Group-by uses these indices to route rows to aggregate
//! slots, and the built column becomes the key column of the result.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use quiver_core::VertexId;

use crate::column::{
    Collection, CollectionBuilder, Column, ColumnBuilder, VertexSet, VertexSetBuilder,
};

/// A column builder that deduplicates on the index element.
///
/// `insert` returns the group index of the element, allocating a new one on
/// first sight. The built column holds one row per distinct element, in
/// discovery order.
pub trait KeyedBuilder {
    /// The index element type.
    type Elem;
    /// The per-row payload type.
    type Data;
    /// The column type this builder produces.
    type Output: Column;

    /// Inserts an element, returning its group index.
    ///
    /// The payload is only stored the first time an element is seen.
    fn insert(&mut self, elem: Self::Elem, data: Self::Data) -> usize;

    /// Returns the number of distinct elements seen so far.
    fn distinct(&self) -> usize;

    /// Finishes the deduplicated column.
    fn build(self) -> Self::Output;
}

/// Columns that support identity-keyed deduplication.
///
/// The keyed set of a vertex set is again a vertex set (so later stages can
/// still access properties of the key column); the keyed set of a collection
/// is a collection of the distinct values.
pub trait KeyedColumn: Column + Sized {
    /// The dedup builder for this column kind.
    type KeyedBuilder: KeyedBuilder<Elem = Self::Elem, Data = Self::Data>;

    /// Creates an empty keyed builder carrying this column's metadata.
    fn keyed_builder(&self) -> Self::KeyedBuilder;
}

impl<D: Clone> KeyedColumn for VertexSet<D> {
    type KeyedBuilder = KeyedVertexSetBuilder<D>;

    fn keyed_builder(&self) -> KeyedVertexSetBuilder<D> {
        KeyedVertexSetBuilder::new(self)
    }
}

impl<T: Clone + Eq + Hash> KeyedColumn for Collection<T> {
    type KeyedBuilder = KeyedCollectionBuilder<T>;

    fn keyed_builder(&self) -> KeyedCollectionBuilder<T> {
        KeyedCollectionBuilder::new()
    }
}

/// Dedup builder over vertex ids; produces a [`VertexSet`].
#[derive(Debug)]
pub struct KeyedVertexSetBuilder<D = ()> {
    inner: VertexSetBuilder<D>,
    index: HashMap<VertexId, usize>,
}

impl<D: Clone> KeyedVertexSetBuilder<D> {
    /// Creates a keyed builder inheriting the base set's label.
    #[must_use]
    pub fn new(base: &VertexSet<D>) -> Self {
        Self { inner: VertexSet::builder(base.label()), index: HashMap::new() }
    }
}

impl<D: Clone> KeyedBuilder for KeyedVertexSetBuilder<D> {
    type Elem = VertexId;
    type Data = D;
    type Output = VertexSet<D>;

    fn insert(&mut self, elem: VertexId, data: D) -> usize {
        match self.index.entry(elem) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let group = self.inner.len();
                self.inner.insert(elem, data);
                entry.insert(group);
                group
            }
        }
    }

    fn distinct(&self) -> usize {
        self.index.len()
    }

    fn build(self) -> VertexSet<D> {
        self.inner.build()
    }
}

/// Dedup builder over plain values; produces a [`Collection`].
#[derive(Debug)]
pub struct KeyedCollectionBuilder<T> {
    inner: CollectionBuilder<T>,
    index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> KeyedCollectionBuilder<T> {
    /// Creates an empty keyed collection builder.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Collection::builder(), index: HashMap::new() }
    }
}

impl<T: Clone + Eq + Hash> Default for KeyedCollectionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> KeyedBuilder for KeyedCollectionBuilder<T> {
    type Elem = T;
    type Data = ();
    type Output = Collection<T>;

    fn insert(&mut self, elem: T, _data: ()) -> usize {
        match self.index.entry(elem) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let group = self.inner.len();
                self.inner.insert(entry.key().clone(), ());
                entry.insert(group);
                group
            }
        }
    }

    fn distinct(&self) -> usize {
        self.index.len()
    }

    fn build(self) -> Collection<T> {
        self.inner.build()
    }
}

#[cfg(test)]
mod tests {
    use quiver_core::LabelId;

    use super::*;

    const PERSON: LabelId = LabelId::new(0);

    #[test]
    fn vertex_dedup_assigns_first_seen_indices() {
        let base = VertexSet::new(PERSON, Vec::new());
        let mut builder = base.keyed_builder();

        assert_eq!(builder.insert(VertexId::new(5), ()), 0);
        assert_eq!(builder.insert(VertexId::new(9), ()), 1);
        assert_eq!(builder.insert(VertexId::new(5), ()), 0);
        assert_eq!(builder.insert(VertexId::new(2), ()), 2);
        assert_eq!(builder.distinct(), 3);

        let set = builder.build();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![VertexId::new(5), VertexId::new(9), VertexId::new(2)]
        );
        assert_eq!(set.label(), PERSON);
    }

    #[test]
    fn vertex_dedup_keeps_first_payload() {
        let base = VertexSet::with_data(PERSON, Vec::new(), Vec::<i64>::new());
        let mut builder = base.keyed_builder();
        builder.insert(VertexId::new(1), 100);
        builder.insert(VertexId::new(1), 200);
        let set = builder.build();
        assert_eq!(set.len(), 1);
        assert_eq!(*set.data(0), 100);
    }

    #[test]
    fn collection_dedup_preserves_discovery_order() {
        let mut builder = KeyedCollectionBuilder::<String>::new();
        for value in ["A", "B", "A", "C", "B"] {
            builder.insert(value.to_owned(), ());
        }
        assert_eq!(builder.distinct(), 3);
        let col = builder.build();
        assert_eq!(col.values(), &["A".to_owned(), "B".to_owned(), "C".to_owned()]);
    }
}
