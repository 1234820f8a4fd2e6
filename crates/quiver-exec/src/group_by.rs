//! The GroupBy / Fold operator.
//!
//! Three entry points, all single-pass and synchronous:
//!
//! - [`GroupByOp::group_by`]: one key (identity or property), 1..=4
//!   aggregates;
//! - [`GroupByOp::group_by_pair`]: two identity keys deduplicated as a
//!   composite, key columns built in lock-step;
//! - [`GroupByOp::fold`]: key-less aggregation over the input's sub-task
//!   scope.
//!
//! The output context *type* is an associated type of the aggregate tuple,
//! so the shape of a result (column kinds, column count, tag numbering)
//! is derived by the compiler from the key and aggregate specs. A key or
//! aggregate combination without a trait impl (a property key in the pair
//! path, MIN over a vertex set, a fifth aggregate) is a type error in the
//! plan, not a runtime fault.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use quiver_core::PropertyValue;

use crate::agg::{AggBuilder, AggSpec};
use crate::column::{BuildableColumn, Collection, CollectionBuilder, Column, ColumnBuilder, VertexSet};
use crate::context::{ColumnAt, Context, RowSet};
use crate::error::{ExecError, ExecResult};
use crate::graph::{GraphAccessor, PropertyColumn};
use crate::keyed::{KeyedBuilder, KeyedColumn};
use crate::offsets::OffsetVector;
use crate::select::{ByProperty, Identity};

/// A static group-key description: the position marker of the source column
/// plus a selector.
#[derive(Debug, Clone)]
pub struct GroupKey<Tm, Sel = Identity> {
    selector: Sel,
    _tag: PhantomData<Tm>,
}

/// Groups by the index element of column `Tm`.
#[must_use]
pub fn key<Tm>() -> GroupKey<Tm> {
    GroupKey { selector: Identity, _tag: PhantomData }
}

/// Groups by property `property` of the vertices in column `Tm`.
#[must_use]
pub fn key_by<Tm, T: PropertyValue>(property: impl Into<String>) -> GroupKey<Tm, ByProperty<T>> {
    GroupKey { selector: ByProperty::new(property), _tag: PhantomData }
}

/// A key spec that can run against context `C` through graph `G`.
pub trait KeySpec<C, G> {
    /// The key column type of the result context.
    type Output: Column;
    /// The builder that deduplicates rows into groups.
    type Builder: KeyBuilder<C, Output = Self::Output>;

    /// Resolves the spec into a builder; property selectors resolve their
    /// column here, before the scan.
    ///
    /// # Errors
    ///
    /// Returns a property-resolution error from the graph accessor.
    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder>;
}

/// The running dedup state of a key during a scan.
pub trait KeyBuilder<C> {
    /// The key column type produced.
    type Output: Column;

    /// Routes row `row` to its group, allocating a new group index on first
    /// sight of the key.
    fn insert(&mut self, ctx: &C, row: usize) -> usize;

    /// Returns the number of groups discovered so far.
    fn distinct(&self) -> usize;

    /// Finishes the key column: one row per group, in discovery order.
    fn build(self) -> Self::Output;
}

/// Key builder for identity keys: delegates to the column's keyed builder.
#[derive(Debug)]
pub struct IdentityKeyBuilder<Tm, B> {
    inner: B,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, B> KeyBuilder<C> for IdentityKeyBuilder<Tm, B>
where
    Tm: ColumnAt<C>,
    B: KeyedBuilder<Elem = <Tm::Col as Column>::Elem, Data = <Tm::Col as Column>::Data>,
{
    type Output = B::Output;

    fn insert(&mut self, ctx: &C, row: usize) -> usize {
        let source = Tm::column(ctx);
        self.inner.insert(source.get(row).clone(), source.data(row).clone())
    }

    fn distinct(&self) -> usize {
        self.inner.distinct()
    }

    fn build(self) -> B::Output {
        self.inner.build()
    }
}

impl<C, G, Tm> KeySpec<C, G> for GroupKey<Tm, Identity>
where
    Tm: ColumnAt<C>,
    Tm::Col: KeyedColumn,
{
    type Output = <<Tm::Col as KeyedColumn>::KeyedBuilder as KeyedBuilder>::Output;
    type Builder = IdentityKeyBuilder<Tm, <Tm::Col as KeyedColumn>::KeyedBuilder>;

    fn into_builder(self, _graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        Ok(IdentityKeyBuilder { inner: Tm::column(ctx).keyed_builder(), _tag: PhantomData })
    }
}

/// Key builder for property keys: deduplicates on the projected value; the
/// key column is a collection of the distinct values.
#[derive(Debug)]
pub struct PropertyKeyBuilder<Tm, T> {
    getter: PropertyColumn<T>,
    index: HashMap<T, usize>,
    out: CollectionBuilder<T>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T, D> KeyBuilder<C> for PropertyKeyBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue + Eq + Hash,
{
    type Output = Collection<T>;

    fn insert(&mut self, ctx: &C, row: usize) -> usize {
        let vertex = *Tm::column(ctx).get(row);
        let value = self.getter.get(vertex).clone();
        match self.index.entry(value) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let group = self.out.len();
                self.out.insert(entry.key().clone(), ());
                entry.insert(group);
                group
            }
        }
    }

    fn distinct(&self) -> usize {
        self.index.len()
    }

    fn build(self) -> Collection<T> {
        self.out.build()
    }
}

impl<C, G, Tm, T, D> KeySpec<C, G> for GroupKey<Tm, ByProperty<T>>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue + Eq + Hash,
    G: GraphAccessor,
{
    type Output = Collection<T>;
    type Builder = PropertyKeyBuilder<Tm, T>;

    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        let source = Tm::column(ctx);
        let getter = graph.vertex_property::<T>(source.label(), self.selector.property())?;
        Ok(PropertyKeyBuilder {
            getter,
            index: HashMap::new(),
            out: Collection::builder(),
            _tag: PhantomData,
        })
    }
}

/// A key usable in the two-key path.
///
/// Only identity keys are implemented: the pair path deduplicates on the
/// composite of the two index elements, and both key columns are rebuilt in
/// lock-step from the rows that opened each group.
pub trait PairKeySpec<C> {
    /// The index element contributed to the composite dedup key.
    type Elem: Clone + Eq + Hash;
    /// The per-row payload stored alongside the element.
    type Data: Clone;
    /// The key column type of the result context.
    type Output: Column<Elem = Self::Elem, Data = Self::Data>;
    /// The plain (non-dedup) builder for the key column.
    type Builder: ColumnBuilder<Output = Self::Output>;

    /// Creates the key column builder.
    fn into_builder(self, ctx: &C) -> Self::Builder;

    /// Returns the element of row `row`.
    fn elem(ctx: &C, row: usize) -> Self::Elem;

    /// Returns the payload of row `row`.
    fn data(ctx: &C, row: usize) -> Self::Data;
}

impl<C, Tm> PairKeySpec<C> for GroupKey<Tm, Identity>
where
    Tm: ColumnAt<C>,
    Tm::Col: BuildableColumn,
    <Tm::Col as Column>::Elem: Eq + Hash,
{
    type Elem = <Tm::Col as Column>::Elem;
    type Data = <Tm::Col as Column>::Data;
    type Output = Tm::Col;
    type Builder = <Tm::Col as BuildableColumn>::Builder;

    fn into_builder(self, ctx: &C) -> Self::Builder {
        Tm::column(ctx).create_builder()
    }

    fn elem(ctx: &C, row: usize) -> Self::Elem {
        Tm::column(ctx).get(row).clone()
    }

    fn data(ctx: &C, row: usize) -> Self::Data {
        Tm::column(ctx).data(row).clone()
    }
}

/// An aggregate tuple runnable under a single key.
///
/// Implemented for tuples of 1 to 4 [`AggSpec`]s. `Output` is the full
/// result context type: key column at position 0, aggregates left to right,
/// head = last aggregate, tags renumbered from 0.
pub trait GroupBySpec<C, G, K>: Sized {
    /// The result context type.
    type Output;

    /// Runs the grouping scan.
    ///
    /// # Errors
    ///
    /// Returns a property-resolution error from the key or an aggregate.
    fn execute(graph: &G, ctx: C, key: K, aggs: Self) -> ExecResult<Self::Output>;
}

/// An aggregate tuple runnable under two identity keys.
pub trait GroupByPairSpec<C, G, K0, K1>: Sized {
    /// The result context type: two key columns, then the aggregates.
    type Output;

    /// Runs the grouping scan.
    ///
    /// # Errors
    ///
    /// Returns a property-resolution error from an aggregate.
    fn execute(graph: &G, ctx: C, keys: (K0, K1), aggs: Self) -> ExecResult<Self::Output>;
}

/// An aggregate tuple runnable as a key-less fold.
///
/// Rows are grouped by the sub-task scope of the input context; the result
/// context holds only aggregate columns and its `base_tag` continues the
/// input's tag numbering.
pub trait FoldSpec<C, G>: Sized {
    /// The result context type.
    type Output;

    /// Runs the fold scan.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::MissingScope`] if the input context has no
    /// sub-task scope, or a property-resolution error from an aggregate.
    fn execute(graph: &G, ctx: C, aggs: Self) -> ExecResult<Self::Output>;
}

macro_rules! impl_group_by_spec {
    ($count:expr; $(($A:ident, $a:ident)),* ; ($Last:ident, $last:ident)) => {
        impl<C, G, K, $($A,)* $Last> GroupBySpec<C, G, K> for ($($A,)* $Last,)
        where
            C: RowSet,
            K: KeySpec<C, G>,
            $($A: AggSpec<C, G>,)*
            $Last: AggSpec<C, G>,
        {
            type Output = Context<$Last::Output, (K::Output, $($A::Output,)*)>;

            fn execute(graph: &G, ctx: C, key: K, aggs: Self) -> ExecResult<Self::Output> {
                let _span =
                    tracing::debug_span!("group_by", rows = ctx.row_count(), aggregates = $count)
                        .entered();

                let ($($a,)* $last,) = aggs;
                let mut key_builder = key.into_builder(graph, &ctx)?;
                $(let mut $a = $a.into_builder(graph, &ctx)?;)*
                let mut $last = $last.into_builder(graph, &ctx)?;

                for row in 0..ctx.row_count() {
                    let group = key_builder.insert(&ctx, row);
                    $($a.accept(&ctx, row, group);)*
                    $last.accept(&ctx, row, group);
                }

                let groups = key_builder.distinct();
                tracing::debug!(groups, "grouping scan complete");

                let key_column = key_builder.build();
                $(let $a = $a.build();)*
                let $last = $last.build();

                let out = Context::new(key_column)$(.push($a.column))*.push($last.column);
                let out = if $count > 1 {
                    let tables = vec![$($a.group_rows,)* $last.group_rows];
                    out.with_offsets(OffsetVector::from_group_rows(tables))
                } else {
                    out
                };
                debug_assert_eq!(out.row_count(), groups);
                Ok(out)
            }
        }
    };
}

impl_group_by_spec!(1; ; (A0, a0));
impl_group_by_spec!(2; (A0, a0); (A1, a1));
impl_group_by_spec!(3; (A0, a0), (A1, a1); (A2, a2));
impl_group_by_spec!(4; (A0, a0), (A1, a1), (A2, a2); (A3, a3));

macro_rules! impl_group_by_pair_spec {
    ($count:expr; $(($A:ident, $a:ident)),* ; ($Last:ident, $last:ident)) => {
        impl<C, G, K0, K1, $($A,)* $Last> GroupByPairSpec<C, G, K0, K1> for ($($A,)* $Last,)
        where
            C: RowSet,
            K0: PairKeySpec<C>,
            K1: PairKeySpec<C>,
            $($A: AggSpec<C, G>,)*
            $Last: AggSpec<C, G>,
        {
            type Output = Context<$Last::Output, (K0::Output, K1::Output, $($A::Output,)*)>;

            fn execute(graph: &G, ctx: C, keys: (K0, K1), aggs: Self) -> ExecResult<Self::Output> {
                let _span = tracing::debug_span!(
                    "group_by_pair",
                    rows = ctx.row_count(),
                    aggregates = $count
                )
                .entered();

                let (key0, key1) = keys;
                let mut key0_builder = key0.into_builder(&ctx);
                let mut key1_builder = key1.into_builder(&ctx);
                let ($($a,)* $last,) = aggs;
                $(let mut $a = $a.into_builder(graph, &ctx)?;)*
                let mut $last = $last.into_builder(graph, &ctx)?;

                let mut seen: HashMap<(K0::Elem, K1::Elem), usize> = HashMap::new();
                for row in 0..ctx.row_count() {
                    let next = key0_builder.len();
                    let group = match seen.entry((K0::elem(&ctx, row), K1::elem(&ctx, row))) {
                        Entry::Occupied(entry) => *entry.get(),
                        Entry::Vacant(entry) => {
                            key0_builder.insert(K0::elem(&ctx, row), K0::data(&ctx, row));
                            key1_builder.insert(K1::elem(&ctx, row), K1::data(&ctx, row));
                            entry.insert(next);
                            next
                        }
                    };
                    $($a.accept(&ctx, row, group);)*
                    $last.accept(&ctx, row, group);
                }

                let key0_column = key0_builder.build();
                let key1_column = key1_builder.build();
                assert_eq!(
                    key0_column.len(),
                    key1_column.len(),
                    "two-key group-by produced misaligned key columns"
                );
                let groups = key0_column.len();
                tracing::debug!(groups, "grouping scan complete");

                $(let $a = $a.build();)*
                let $last = $last.build();

                let out = Context::new(key0_column)
                    .push(key1_column)
                    $(.push($a.column))*
                    .push($last.column);
                let out = if $count > 1 {
                    let tables = vec![$($a.group_rows,)* $last.group_rows];
                    out.with_offsets(OffsetVector::from_group_rows(tables))
                } else {
                    out
                };
                Ok(out)
            }
        }
    };
}

impl_group_by_pair_spec!(1; ; (A0, a0));
impl_group_by_pair_spec!(2; (A0, a0); (A1, a1));
impl_group_by_pair_spec!(3; (A0, a0), (A1, a1); (A2, a2));
impl_group_by_pair_spec!(4; (A0, a0), (A1, a1), (A2, a2); (A3, a3));

impl<C, G, A0> FoldSpec<C, G> for (A0,)
where
    C: RowSet,
    A0: AggSpec<C, G>,
{
    type Output = Context<A0::Output, ()>;

    fn execute(graph: &G, ctx: C, aggs: Self) -> ExecResult<Self::Output> {
        let _span = tracing::debug_span!("fold", rows = ctx.row_count(), aggregates = 1).entered();

        let (a0,) = aggs;
        let mut a0 = a0.into_builder(graph, &ctx)?;
        {
            let (start_tag, scope) = ctx.scope().ok_or(ExecError::MissingScope)?;
            tracing::trace!(start_tag = start_tag.as_u32(), "folding over sub-task scope");
            let mut groups_seen: HashMap<usize, usize> = HashMap::new();
            for row in 0..ctx.row_count() {
                let next = groups_seen.len();
                let group = *groups_seen.entry(scope[row]).or_insert(next);
                a0.accept(&ctx, row, group);
            }
        }
        let base = ctx.max_tag().offset(1);
        let a0 = a0.build();
        Ok(Context::with_base(a0.column, base))
    }
}

macro_rules! impl_fold_spec {
    ($count:expr; ($First:ident, $first:ident) $(, ($Mid:ident, $mid:ident))* ; ($Last:ident, $last:ident)) => {
        impl<C, G, $First, $($Mid,)* $Last> FoldSpec<C, G> for ($First, $($Mid,)* $Last,)
        where
            C: RowSet,
            $First: AggSpec<C, G>,
            $($Mid: AggSpec<C, G>,)*
            $Last: AggSpec<C, G>,
        {
            type Output = Context<$Last::Output, ($First::Output, $($Mid::Output,)*)>;

            fn execute(graph: &G, ctx: C, aggs: Self) -> ExecResult<Self::Output> {
                let _span =
                    tracing::debug_span!("fold", rows = ctx.row_count(), aggregates = $count)
                        .entered();

                let ($first, $($mid,)* $last,) = aggs;
                let mut $first = $first.into_builder(graph, &ctx)?;
                $(let mut $mid = $mid.into_builder(graph, &ctx)?;)*
                let mut $last = $last.into_builder(graph, &ctx)?;
                {
                    let (start_tag, scope) = ctx.scope().ok_or(ExecError::MissingScope)?;
                    tracing::trace!(start_tag = start_tag.as_u32(), "folding over sub-task scope");
                    let mut groups_seen: HashMap<usize, usize> = HashMap::new();
                    for row in 0..ctx.row_count() {
                        let next = groups_seen.len();
                        let group = *groups_seen.entry(scope[row]).or_insert(next);
                        $first.accept(&ctx, row, group);
                        $($mid.accept(&ctx, row, group);)*
                        $last.accept(&ctx, row, group);
                    }
                }
                let base = ctx.max_tag().offset(1);
                let $first = $first.build();
                $(let $mid = $mid.build();)*
                let $last = $last.build();

                let out = Context::with_base($first.column, base)
                    $(.push($mid.column))*
                    .push($last.column);
                let tables = vec![$first.group_rows, $($mid.group_rows,)* $last.group_rows];
                Ok(out.with_offsets(OffsetVector::from_group_rows(tables)))
            }
        }
    };
}

impl_fold_spec!(2; (A0, a0); (A1, a1));
impl_fold_spec!(3; (A0, a0), (A1, a1); (A2, a2));
impl_fold_spec!(4; (A0, a0), (A1, a1), (A2, a2); (A3, a3));

/// The GroupBy / Fold operator.
///
/// Stateless: each call owns its input context, runs one scan, and returns
/// a fresh context.
#[derive(Debug, Clone, Copy)]
pub struct GroupByOp;

impl GroupByOp {
    /// Groups `ctx` by `key` and runs the aggregate tuple `aggs`.
    ///
    /// # Errors
    ///
    /// Returns a property-resolution error from the key or an aggregate.
    pub fn group_by<G, C, K, A>(graph: &G, ctx: C, key: K, aggs: A) -> ExecResult<A::Output>
    where
        A: GroupBySpec<C, G, K>,
    {
        A::execute(graph, ctx, key, aggs)
    }

    /// Groups `ctx` by the composite of two identity keys.
    ///
    /// # Errors
    ///
    /// Returns a property-resolution error from an aggregate.
    pub fn group_by_pair<G, C, K0, K1, A>(
        graph: &G,
        ctx: C,
        keys: (K0, K1),
        aggs: A,
    ) -> ExecResult<A::Output>
    where
        A: GroupByPairSpec<C, G, K0, K1>,
    {
        A::execute(graph, ctx, keys, aggs)
    }

    /// Folds `ctx` over its sub-task scope, with no key.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::MissingScope`] if the context has no scope, or
    /// a property-resolution error from an aggregate.
    pub fn fold<G, C, A>(graph: &G, ctx: C, aggs: A) -> ExecResult<A::Output>
    where
        A: FoldSpec<C, G>,
    {
        A::execute(graph, ctx, aggs)
    }
}

#[cfg(test)]
mod tests {
    use quiver_core::Tag;

    use crate::agg;
    use crate::graph::NullGraph;

    use super::*;
    use crate::context::T0;

    #[test]
    fn single_key_count() {
        let values: Vec<String> = ["A", "B", "A", "C", "B"].iter().map(|s| (*s).into()).collect();
        let ctx = Context::new(Collection::new(values));

        let out = GroupByOp::group_by(&NullGraph, ctx, key::<T0>(), (agg::count::<T0>(),)).unwrap();

        assert_eq!(
            out.column::<T0>().values(),
            &["A".to_owned(), "B".to_owned(), "C".to_owned()]
        );
        assert_eq!(out.head().values(), &[2, 2, 1]);
        assert_eq!(out.base_tag(), Tag::new(0));
        assert_eq!(out.head_tag(), Tag::new(1));
        assert!(out.offsets().is_none());
    }

    #[test]
    fn fold_without_scope_is_rejected() {
        let ctx = Context::new(Collection::new(vec![1i64, 2, 3]));
        let err = GroupByOp::fold(&NullGraph, ctx, (agg::count::<T0>(),)).unwrap_err();
        assert_eq!(err, ExecError::MissingScope);
    }

    #[test]
    fn fold_renumbers_from_past_the_input() {
        let ctx = Context::new(Collection::new(vec![1i64, 2, 3]))
            .with_scope(Tag::new(0), vec![0, 0, 0]);
        let out = GroupByOp::fold(&NullGraph, ctx, (agg::count::<T0>(),)).unwrap();
        assert_eq!(out.base_tag(), Tag::new(1));
        assert_eq!(out.head_tag(), Tag::new(1));
        assert_eq!(out.head().values(), &[3]);
    }
}
