//! In-memory execution core for the Quiver graph query engine.
//!
//! Data flows between operators as typed, columnar [`Context`]s: an ordered
//! product of column containers ([`VertexSet`], [`TwoLabelVertexSet`],
//! [`EdgeSet`], [`Collection`]), index-aligned row-wise and addressed by
//! compile-time position markers. The crate provides:
//!
//! - [`column`]: the column containers and their builders
//! - [`keyed`]: dedup builders assigning first-seen group indices
//! - [`agg`]: the aggregate spec and builder family
//! - [`context`]: the context product type and position machinery
//! - [`group_by`]: the GroupBy / Fold operator
//! - [`graph`]: the [`GraphAccessor`] boundary to storage
//!
//! The shape of every operator result (column kinds, column count, tag
//! numbering) is derived at compile time from the operator's key and
//! aggregate specs; an unsupported combination is a type error in the plan.

pub mod agg;
pub mod column;
pub mod context;
pub mod error;
pub mod graph;
pub mod group_by;
pub mod keyed;
pub mod offsets;
pub mod select;

pub use column::{
    Collection, CollectionBuilder, Edge, EdgeSet, EdgeSetBuilder, TwoLabelVertexSet,
    TwoLabelVertexSetBuilder, VertexSet, VertexSetBuilder,
};
pub use column::{BuildableColumn, Column, ColumnBuilder};
pub use context::{ColumnAt, Context, RowSet, T0, T1, T2, T3, T4, T5};
pub use error::{ExecError, ExecResult};
pub use graph::{GraphAccessor, MemoryGraph, NullGraph, PropertyColumn};
pub use group_by::{key, key_by, GroupByOp, GroupKey};
pub use keyed::{KeyedBuilder, KeyedColumn};
pub use offsets::OffsetVector;
pub use select::{ByProperty, Identity};
