//! Columnar containers for execution contexts.
//!
//! Every column of a context is one of these containers:
//!
//! - [`VertexSet`]: vertices of a single label, optionally with a data payload
//! - [`TwoLabelVertexSet`]: vertices drawn from two labels, with a per-row slot
//! - [`EdgeSet`]: edges of a single (src, edge, dst) label triplet
//! - [`Collection`]: a generic value column
//!
//! Containers are immutable once built. Each has a companion builder; a
//! builder's `build` is infallible, and misuse (misaligned inserts) panics.

mod collection;
mod edge;
mod two_label;
mod vertex;

pub use collection::{Collection, CollectionBuilder};
pub use edge::{Edge, EdgeSet, EdgeSetBuilder};
pub use two_label::{TwoLabelVertexSet, TwoLabelVertexSetBuilder};
pub use vertex::{VertexSet, VertexSetBuilder};

/// A fixed-length column of an execution context.
///
/// Rows are addressed by position. `Elem` is the index element a row exposes
/// for keying and selection (a vertex id for vertex sets, the value itself
/// for collections); `Data` is the per-row payload carried alongside it.
pub trait Column {
    /// The index element type of a row.
    type Elem: Clone;
    /// The per-row payload type.
    type Data: Clone;

    /// Returns the number of rows in this column.
    fn len(&self) -> usize;

    /// Returns true if the column has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the index element at `row`.
    fn get(&self, row: usize) -> &Self::Elem;

    /// Returns the payload at `row`.
    fn data(&self, row: usize) -> &Self::Data;
}

/// An append-only builder producing a [`Column`].
pub trait ColumnBuilder {
    /// The column type this builder produces.
    type Output: Column;

    /// Appends one row.
    fn insert(
        &mut self,
        elem: <Self::Output as Column>::Elem,
        data: <Self::Output as Column>::Data,
    );

    /// Returns the number of rows inserted so far.
    fn len(&self) -> usize;

    /// Returns true if nothing has been inserted yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finishes the column.
    fn build(self) -> Self::Output;
}

/// Columns that can seed a fresh builder of their own shape.
///
/// The new builder starts empty but inherits the column's metadata (labels),
/// so rows selected out of an existing column can be re-assembled into a
/// column of the same kind.
pub trait BuildableColumn: Column + Sized {
    /// The builder type for this column kind.
    type Builder: ColumnBuilder<Output = Self>;

    /// Creates an empty builder carrying this column's metadata.
    fn create_builder(&self) -> Self::Builder;
}
