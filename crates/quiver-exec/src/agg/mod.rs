//! Aggregate functions and their builders.
//!
//! An aggregate is described statically by an [`Agg`] spec: a function
//! marker (e.g. [`Count`]), a position marker naming the source column, and
//! a selector ([`Identity`] or [`ByProperty`]). The supported combinations
//! of source column kind, function, and selector are exactly the
//! [`AggSpec`] impls in this module; a combination without an impl fails to
//! type-check when the plan is compiled, never at runtime.
//!
//! During a scan, each aggregate runs as an [`AggBuilder`]: it is fed every
//! row together with the row's group index and produces one output row per
//! group, in group order.

mod builders;

pub use builders::{
    CountBuilder, CountDistinctBuilder, FirstBuilder, FirstByBuilder, MaxByBuilder, MinBuilder,
    SumBuilder, ToListBuilder, ToListByBuilder, ToSetBuilder, ToSetByBuilder,
};

use std::marker::PhantomData;

use quiver_core::PropertyValue;

use crate::column::Column;
use crate::error::ExecResult;
use crate::select::{ByProperty, Identity};

/// COUNT: number of rows per group.
#[derive(Debug, Clone, Copy)]
pub struct Count;
/// COUNT_DISTINCT: number of distinct source elements per group.
#[derive(Debug, Clone, Copy)]
pub struct CountDistinct;
/// SUM: sum of the source values per group.
#[derive(Debug, Clone, Copy)]
pub struct Sum;
/// MIN: least source value per group.
#[derive(Debug, Clone, Copy)]
pub struct Min;
/// MAX: greatest selected value per group.
#[derive(Debug, Clone, Copy)]
pub struct Max;
/// FIRST: the group's first row, in input order.
#[derive(Debug, Clone, Copy)]
pub struct First;
/// TO_LIST: all selected values of the group, in input order.
#[derive(Debug, Clone, Copy)]
pub struct ToList;
/// TO_SET: the distinct selected values of the group, in first-seen order.
#[derive(Debug, Clone, Copy)]
pub struct ToSet;

/// A static aggregate description.
///
/// `F` is the function marker, `Tm` the position marker of the source
/// column, `Sel` the selector applied to each source row.
#[derive(Debug, Clone)]
pub struct Agg<F, Tm, Sel = Identity> {
    selector: Sel,
    _spec: PhantomData<(F, Tm)>,
}

impl<F, Tm, Sel> Agg<F, Tm, Sel> {
    /// Returns the selector.
    #[must_use]
    pub fn selector(&self) -> &Sel {
        &self.selector
    }

    fn with_selector(selector: Sel) -> Self {
        Self { selector, _spec: PhantomData }
    }
}

/// Counts the rows of each group.
#[must_use]
pub fn count<Tm>() -> Agg<Count, Tm> {
    Agg::with_selector(Identity)
}

/// Counts the distinct elements of column `Tm` in each group.
#[must_use]
pub fn count_distinct<Tm>() -> Agg<CountDistinct, Tm> {
    Agg::with_selector(Identity)
}

/// Sums the values of collection column `Tm` in each group.
#[must_use]
pub fn sum<Tm>() -> Agg<Sum, Tm> {
    Agg::with_selector(Identity)
}

/// Takes the least value of collection column `Tm` in each group.
#[must_use]
pub fn min<Tm>() -> Agg<Min, Tm> {
    Agg::with_selector(Identity)
}

/// Takes the greatest value of property `property` over vertex column `Tm`
/// in each group.
#[must_use]
pub fn max_by<Tm, T: PropertyValue>(property: impl Into<String>) -> Agg<Max, Tm, ByProperty<T>> {
    Agg::with_selector(ByProperty::new(property))
}

/// Keeps the first row of column `Tm` in each group.
#[must_use]
pub fn first<Tm>() -> Agg<First, Tm> {
    Agg::with_selector(Identity)
}

/// Keeps property `property` of the first row of vertex column `Tm` in each
/// group.
#[must_use]
pub fn first_by<Tm, T: PropertyValue>(property: impl Into<String>) -> Agg<First, Tm, ByProperty<T>> {
    Agg::with_selector(ByProperty::new(property))
}

/// Collects the values of collection column `Tm` in each group, in input
/// order.
#[must_use]
pub fn to_list<Tm>() -> Agg<ToList, Tm> {
    Agg::with_selector(Identity)
}

/// Collects property `property` over vertex column `Tm` in each group, in
/// input order.
#[must_use]
pub fn to_list_by<Tm, T: PropertyValue>(
    property: impl Into<String>,
) -> Agg<ToList, Tm, ByProperty<T>> {
    Agg::with_selector(ByProperty::new(property))
}

/// Collects the distinct values of collection column `Tm` in each group, in
/// first-seen order.
#[must_use]
pub fn to_set<Tm>() -> Agg<ToSet, Tm> {
    Agg::with_selector(Identity)
}

/// Collects the distinct values of property `property` over vertex column
/// `Tm` in each group, in first-seen order.
#[must_use]
pub fn to_set_by<Tm, T: PropertyValue>(
    property: impl Into<String>,
) -> Agg<ToSet, Tm, ByProperty<T>> {
    Agg::with_selector(ByProperty::new(property))
}

/// A finished aggregate: its output column plus, per group, the number of
/// underlying rows that went into the group's value.
#[derive(Debug)]
pub struct BuiltAggregate<Col> {
    /// One row per group, in group order.
    pub column: Col,
    /// Per-group underlying row counts, feeding the offset vector.
    pub group_rows: Vec<usize>,
}

/// An aggregate spec that can run against context `C` through graph `G`.
///
/// The output column type is fixed by the impl, so the shape of a group-by
/// result is known at plan-compile time.
pub trait AggSpec<C, G> {
    /// The output column type.
    type Output: Column;
    /// The builder that computes it.
    type Builder: AggBuilder<C, Output = Self::Output>;

    /// Resolves the spec into a builder.
    ///
    /// Property selectors resolve their column here, before the scan; this
    /// is the only fallible step of an aggregate.
    ///
    /// # Errors
    ///
    /// Returns a property-resolution error from the graph accessor.
    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder>;
}

/// The running state of one aggregate during a scan.
///
/// `accept` is called once per input row. Group indices arrive in strict
/// first-seen order: a call either targets an existing group or opens group
/// `n` when `n` groups exist.
pub trait AggBuilder<C> {
    /// The output column type.
    type Output: Column;

    /// Folds row `row` of the context into group `group`.
    fn accept(&mut self, ctx: &C, row: usize, group: usize);

    /// Finishes the aggregate.
    fn build(self) -> BuiltAggregate<Self::Output>;
}
