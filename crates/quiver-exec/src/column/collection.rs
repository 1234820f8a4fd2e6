//! Generic value collections.

use super::{BuildableColumn, Column, ColumnBuilder};

/// A column of plain values.
///
/// Aggregate outputs (counts, sums, grouped lists) and property projections
/// land in collections. The value itself is the index element; there is no
/// separate payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    values: Vec<T>,
}

impl<T: Clone> Collection<T> {
    /// Creates a collection from the given values.
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Iterates over the values in row order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Returns the values as a slice.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Creates an empty builder.
    #[must_use]
    pub fn builder() -> CollectionBuilder<T> {
        CollectionBuilder { values: Vec::new() }
    }
}

impl<T: Clone> From<Vec<T>> for Collection<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

impl<T: Clone> Column for Collection<T> {
    type Elem = T;
    type Data = ();

    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, row: usize) -> &T {
        &self.values[row]
    }

    fn data(&self, _row: usize) -> &() {
        &()
    }
}

impl<T: Clone> BuildableColumn for Collection<T> {
    type Builder = CollectionBuilder<T>;

    fn create_builder(&self) -> CollectionBuilder<T> {
        Self::builder()
    }
}

/// Builder for [`Collection`].
#[derive(Debug)]
pub struct CollectionBuilder<T> {
    values: Vec<T>,
}

impl<T: Clone> ColumnBuilder for CollectionBuilder<T> {
    type Output = Collection<T>;

    fn insert(&mut self, elem: T, _data: ()) {
        self.values.push(elem);
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn build(self) -> Collection<T> {
        Collection { values: self.values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_rows() {
        let col = Collection::new(vec![10i64, 20, 30]);
        assert_eq!(col.len(), 3);
        assert_eq!(*col.get(2), 30);
        assert_eq!(col.values(), &[10, 20, 30]);
    }

    #[test]
    fn builder_roundtrip() {
        let mut builder = Collection::<String>::builder();
        builder.insert("a".into(), ());
        builder.insert("b".into(), ());
        assert_eq!(builder.len(), 2);
        let col = builder.build();
        assert_eq!(col.values(), &["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn from_vec() {
        let col: Collection<bool> = vec![true, false].into();
        assert!(!col.is_empty());
        assert!(*col.get(0));
    }
}
