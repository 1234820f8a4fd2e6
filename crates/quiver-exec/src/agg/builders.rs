//! Builder types backing each supported aggregate combination.

use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::AddAssign;

use quiver_core::PropertyValue;

use crate::column::{BuildableColumn, Collection, Column, ColumnBuilder, VertexSet};
use crate::context::ColumnAt;
use crate::error::ExecResult;
use crate::graph::{GraphAccessor, PropertyColumn};
use crate::select::{ByProperty, Identity};

use super::{
    Agg, AggBuilder, AggSpec, BuiltAggregate, Count, CountDistinct, First, Max, Min, Sum, ToList,
    ToSet,
};

/// Returns the per-group slot, opening group `group` if it is new.
///
/// Group indices arrive in strict first-seen order, so a new group is
/// always the next free slot.
fn slot<T>(groups: &mut Vec<T>, group: usize, empty: impl FnOnce() -> T) -> &mut T {
    if group == groups.len() {
        groups.push(empty());
    }
    &mut groups[group]
}

/// Counts rows per group. Output: `Collection<u64>`.
#[derive(Debug, Default)]
pub struct CountBuilder {
    counts: Vec<u64>,
}

impl CountBuilder {
    /// Creates an empty count builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> AggBuilder<C> for CountBuilder {
    type Output = Collection<u64>;

    fn accept(&mut self, _ctx: &C, _row: usize, group: usize) {
        *slot(&mut self.counts, group, || 0) += 1;
    }

    fn build(self) -> BuiltAggregate<Collection<u64>> {
        let group_rows = vec![1; self.counts.len()];
        BuiltAggregate { column: Collection::new(self.counts), group_rows }
    }
}

impl<C, G, Tm> AggSpec<C, G> for Agg<Count, Tm, Identity>
where
    Tm: ColumnAt<C>,
{
    type Output = Collection<u64>;
    type Builder = CountBuilder;

    fn into_builder(self, _graph: &G, _ctx: &C) -> ExecResult<CountBuilder> {
        Ok(CountBuilder::new())
    }
}

/// Counts distinct source elements per group. Output: `Collection<u64>`.
#[derive(Debug)]
pub struct CountDistinctBuilder<Tm, E> {
    seen: Vec<HashSet<E>>,
    _tag: PhantomData<Tm>,
}

impl<Tm, E> CountDistinctBuilder<Tm, E> {
    fn new() -> Self {
        Self { seen: Vec::new(), _tag: PhantomData }
    }
}

impl<C, Tm, E> AggBuilder<C> for CountDistinctBuilder<Tm, E>
where
    Tm: ColumnAt<C>,
    Tm::Col: Column<Elem = E>,
    E: Clone + Eq + Hash,
{
    type Output = Collection<u64>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let elem = Tm::column(ctx).get(row).clone();
        slot(&mut self.seen, group, HashSet::new).insert(elem);
    }

    fn build(self) -> BuiltAggregate<Collection<u64>> {
        let counts: Vec<u64> = self.seen.iter().map(|s| s.len() as u64).collect();
        let group_rows = vec![1; counts.len()];
        BuiltAggregate { column: Collection::new(counts), group_rows }
    }
}

impl<C, G, Tm, E> AggSpec<C, G> for Agg<CountDistinct, Tm, Identity>
where
    Tm: ColumnAt<C>,
    Tm::Col: Column<Elem = E>,
    E: Clone + Eq + Hash,
{
    type Output = Collection<u64>;
    type Builder = CountDistinctBuilder<Tm, E>;

    fn into_builder(self, _graph: &G, _ctx: &C) -> ExecResult<Self::Builder> {
        Ok(CountDistinctBuilder::new())
    }
}

/// Sums collection values per group. Output: `Collection<T>`.
#[derive(Debug)]
pub struct SumBuilder<Tm, T> {
    sums: Vec<T>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T> AggBuilder<C> for SumBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone + AddAssign,
{
    type Output = Collection<T>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let value = Tm::column(ctx).get(row).clone();
        if group == self.sums.len() {
            self.sums.push(value);
        } else {
            self.sums[group] += value;
        }
    }

    fn build(self) -> BuiltAggregate<Collection<T>> {
        let group_rows = vec![1; self.sums.len()];
        BuiltAggregate { column: Collection::new(self.sums), group_rows }
    }
}

impl<C, G, Tm, T> AggSpec<C, G> for Agg<Sum, Tm, Identity>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone + AddAssign,
{
    type Output = Collection<T>;
    type Builder = SumBuilder<Tm, T>;

    fn into_builder(self, _graph: &G, _ctx: &C) -> ExecResult<Self::Builder> {
        Ok(SumBuilder { sums: Vec::new(), _tag: PhantomData })
    }
}

/// Takes the least collection value per group. Output: `Collection<T>`.
#[derive(Debug)]
pub struct MinBuilder<Tm, T> {
    mins: Vec<T>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T> AggBuilder<C> for MinBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone + Ord,
{
    type Output = Collection<T>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let value = Tm::column(ctx).get(row);
        if group == self.mins.len() {
            self.mins.push(value.clone());
        } else if *value < self.mins[group] {
            self.mins[group] = value.clone();
        }
    }

    fn build(self) -> BuiltAggregate<Collection<T>> {
        let group_rows = vec![1; self.mins.len()];
        BuiltAggregate { column: Collection::new(self.mins), group_rows }
    }
}

impl<C, G, Tm, T> AggSpec<C, G> for Agg<Min, Tm, Identity>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone + Ord,
{
    type Output = Collection<T>;
    type Builder = MinBuilder<Tm, T>;

    fn into_builder(self, _graph: &G, _ctx: &C) -> ExecResult<Self::Builder> {
        Ok(MinBuilder { mins: Vec::new(), _tag: PhantomData })
    }
}

/// Takes the greatest property value over a vertex column per group.
/// Output: `Collection<T>`.
#[derive(Debug)]
pub struct MaxByBuilder<Tm, T> {
    getter: PropertyColumn<T>,
    maxes: Vec<T>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T, D> AggBuilder<C> for MaxByBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue + Ord,
{
    type Output = Collection<T>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let vertex = *Tm::column(ctx).get(row);
        let value = self.getter.get(vertex);
        if group == self.maxes.len() {
            self.maxes.push(value.clone());
        } else if *value > self.maxes[group] {
            self.maxes[group] = value.clone();
        }
    }

    fn build(self) -> BuiltAggregate<Collection<T>> {
        let group_rows = vec![1; self.maxes.len()];
        BuiltAggregate { column: Collection::new(self.maxes), group_rows }
    }
}

impl<C, G, Tm, T, D> AggSpec<C, G> for Agg<Max, Tm, ByProperty<T>>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue + Ord,
    G: GraphAccessor,
{
    type Output = Collection<T>;
    type Builder = MaxByBuilder<Tm, T>;

    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        let source = Tm::column(ctx);
        let getter = graph.vertex_property::<T>(source.label(), self.selector.property())?;
        Ok(MaxByBuilder { getter, maxes: Vec::new(), _tag: PhantomData })
    }
}

/// Keeps the first row of the source column per group. Output: the source
/// column kind.
#[derive(Debug)]
pub struct FirstBuilder<Tm, B> {
    inner: B,
    built: usize,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, B> AggBuilder<C> for FirstBuilder<Tm, B>
where
    Tm: ColumnAt<C>,
    Tm::Col: BuildableColumn<Builder = B>,
    B: ColumnBuilder<Output = Tm::Col>,
{
    type Output = Tm::Col;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        if group == self.built {
            let source = Tm::column(ctx);
            self.inner.insert(source.get(row).clone(), source.data(row).clone());
            self.built += 1;
        }
    }

    fn build(self) -> BuiltAggregate<Tm::Col> {
        BuiltAggregate { column: self.inner.build(), group_rows: vec![1; self.built] }
    }
}

impl<C, G, Tm> AggSpec<C, G> for Agg<First, Tm, Identity>
where
    Tm: ColumnAt<C>,
    Tm::Col: BuildableColumn,
{
    type Output = Tm::Col;
    type Builder = FirstBuilder<Tm, <Tm::Col as BuildableColumn>::Builder>;

    fn into_builder(self, _graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        Ok(FirstBuilder { inner: Tm::column(ctx).create_builder(), built: 0, _tag: PhantomData })
    }
}

/// Keeps a property of the first row of a vertex column per group.
/// Output: `Collection<T>`.
#[derive(Debug)]
pub struct FirstByBuilder<Tm, T> {
    getter: PropertyColumn<T>,
    values: Vec<T>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T, D> AggBuilder<C> for FirstByBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue,
{
    type Output = Collection<T>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        if group == self.values.len() {
            let vertex = *Tm::column(ctx).get(row);
            self.values.push(self.getter.get(vertex).clone());
        }
    }

    fn build(self) -> BuiltAggregate<Collection<T>> {
        let group_rows = vec![1; self.values.len()];
        BuiltAggregate { column: Collection::new(self.values), group_rows }
    }
}

impl<C, G, Tm, T, D> AggSpec<C, G> for Agg<First, Tm, ByProperty<T>>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue,
    G: GraphAccessor,
{
    type Output = Collection<T>;
    type Builder = FirstByBuilder<Tm, T>;

    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        let source = Tm::column(ctx);
        let getter = graph.vertex_property::<T>(source.label(), self.selector.property())?;
        Ok(FirstByBuilder { getter, values: Vec::new(), _tag: PhantomData })
    }
}

/// Collects collection values per group, in input order.
/// Output: `Collection<Vec<T>>`.
#[derive(Debug)]
pub struct ToListBuilder<Tm, T> {
    groups: Vec<Vec<T>>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T> AggBuilder<C> for ToListBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone,
{
    type Output = Collection<Vec<T>>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let value = Tm::column(ctx).get(row).clone();
        slot(&mut self.groups, group, Vec::new).push(value);
    }

    fn build(self) -> BuiltAggregate<Collection<Vec<T>>> {
        let group_rows = self.groups.iter().map(Vec::len).collect();
        BuiltAggregate { column: Collection::new(self.groups), group_rows }
    }
}

impl<C, G, Tm, T> AggSpec<C, G> for Agg<ToList, Tm, Identity>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone,
{
    type Output = Collection<Vec<T>>;
    type Builder = ToListBuilder<Tm, T>;

    fn into_builder(self, _graph: &G, _ctx: &C) -> ExecResult<Self::Builder> {
        Ok(ToListBuilder { groups: Vec::new(), _tag: PhantomData })
    }
}

/// Collects a property over a vertex column per group, in input order.
/// Output: `Collection<Vec<T>>`.
#[derive(Debug)]
pub struct ToListByBuilder<Tm, T> {
    getter: PropertyColumn<T>,
    groups: Vec<Vec<T>>,
    _tag: PhantomData<Tm>,
}

impl<C, Tm, T, D> AggBuilder<C> for ToListByBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue,
{
    type Output = Collection<Vec<T>>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let vertex = *Tm::column(ctx).get(row);
        let value = self.getter.get(vertex).clone();
        slot(&mut self.groups, group, Vec::new).push(value);
    }

    fn build(self) -> BuiltAggregate<Collection<Vec<T>>> {
        let group_rows = self.groups.iter().map(Vec::len).collect();
        BuiltAggregate { column: Collection::new(self.groups), group_rows }
    }
}

impl<C, G, Tm, T, D> AggSpec<C, G> for Agg<ToList, Tm, ByProperty<T>>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue,
    G: GraphAccessor,
{
    type Output = Collection<Vec<T>>;
    type Builder = ToListByBuilder<Tm, T>;

    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        let source = Tm::column(ctx);
        let getter = graph.vertex_property::<T>(source.label(), self.selector.property())?;
        Ok(ToListByBuilder { getter, groups: Vec::new(), _tag: PhantomData })
    }
}

/// Collects distinct collection values per group, in first-seen order.
/// Output: `Collection<Vec<T>>`.
#[derive(Debug)]
pub struct ToSetBuilder<Tm, T> {
    groups: Vec<Vec<T>>,
    seen: Vec<HashSet<T>>,
    _tag: PhantomData<Tm>,
}

impl<Tm, T> ToSetBuilder<Tm, T> {
    fn push_distinct(&mut self, group: usize, value: T)
    where
        T: Clone + Eq + Hash,
    {
        slot(&mut self.groups, group, Vec::new);
        if slot(&mut self.seen, group, HashSet::new).insert(value.clone()) {
            self.groups[group].push(value);
        }
    }

    fn finish(self) -> BuiltAggregate<Collection<Vec<T>>>
    where
        T: Clone,
    {
        let group_rows = self.groups.iter().map(Vec::len).collect();
        BuiltAggregate { column: Collection::new(self.groups), group_rows }
    }
}

impl<C, Tm, T> AggBuilder<C> for ToSetBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone + Eq + Hash,
{
    type Output = Collection<Vec<T>>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let value = Tm::column(ctx).get(row).clone();
        self.push_distinct(group, value);
    }

    fn build(self) -> BuiltAggregate<Collection<Vec<T>>> {
        self.finish()
    }
}

impl<C, G, Tm, T> AggSpec<C, G> for Agg<ToSet, Tm, Identity>
where
    Tm: ColumnAt<C, Col = Collection<T>>,
    T: Clone + Eq + Hash,
{
    type Output = Collection<Vec<T>>;
    type Builder = ToSetBuilder<Tm, T>;

    fn into_builder(self, _graph: &G, _ctx: &C) -> ExecResult<Self::Builder> {
        Ok(ToSetBuilder { groups: Vec::new(), seen: Vec::new(), _tag: PhantomData })
    }
}

/// Collects distinct property values over a vertex column per group, in
/// first-seen order. Output: `Collection<Vec<T>>`.
#[derive(Debug)]
pub struct ToSetByBuilder<Tm, T> {
    getter: PropertyColumn<T>,
    inner: ToSetBuilder<Tm, T>,
}

impl<C, Tm, T, D> AggBuilder<C> for ToSetByBuilder<Tm, T>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue + Eq + Hash,
{
    type Output = Collection<Vec<T>>;

    fn accept(&mut self, ctx: &C, row: usize, group: usize) {
        let vertex = *Tm::column(ctx).get(row);
        let value = self.getter.get(vertex).clone();
        self.inner.push_distinct(group, value);
    }

    fn build(self) -> BuiltAggregate<Collection<Vec<T>>> {
        self.inner.finish()
    }
}

impl<C, G, Tm, T, D> AggSpec<C, G> for Agg<ToSet, Tm, ByProperty<T>>
where
    Tm: ColumnAt<C, Col = VertexSet<D>>,
    D: Clone,
    T: PropertyValue + Eq + Hash,
    G: GraphAccessor,
{
    type Output = Collection<Vec<T>>;
    type Builder = ToSetByBuilder<Tm, T>;

    fn into_builder(self, graph: &G, ctx: &C) -> ExecResult<Self::Builder> {
        let source = Tm::column(ctx);
        let getter = graph.vertex_property::<T>(source.label(), self.selector.property())?;
        Ok(ToSetByBuilder {
            getter,
            inner: ToSetBuilder { groups: Vec::new(), seen: Vec::new(), _tag: PhantomData },
        })
    }
}

#[cfg(test)]
mod tests {
    use quiver_core::{LabelId, VertexId};

    use crate::agg;
    use crate::context::{Context, T0};
    use crate::graph::{MemoryGraph, NullGraph};

    use super::*;

    const PERSON: LabelId = LabelId::new(0);

    fn run<C, G, S: AggSpec<C, G>>(spec: S, graph: &G, ctx: &C, groups: &[usize]) -> S::Output {
        let mut builder = spec.into_builder(graph, ctx).unwrap();
        for (row, &group) in groups.iter().enumerate() {
            builder.accept(ctx, row, group);
        }
        builder.build().column
    }

    #[test]
    fn count_rows_per_group() {
        let ctx = Context::new(Collection::new(vec![1i64, 2, 3, 4, 5]));
        let counts = run(agg::count::<T0>(), &NullGraph, &ctx, &[0, 1, 0, 2, 1]);
        assert_eq!(counts.values(), &[2, 2, 1]);
    }

    #[test]
    fn count_distinct_elements() {
        let ctx = Context::new(Collection::new(vec![7i64, 7, 8, 7]));
        let counts = run(agg::count_distinct::<T0>(), &NullGraph, &ctx, &[0, 0, 0, 1]);
        assert_eq!(counts.values(), &[2, 1]);
    }

    #[test]
    fn sum_and_min() {
        let ctx = Context::new(Collection::new(vec![10i64, 20, 30, 40]));
        let sums = run(agg::sum::<T0>(), &NullGraph, &ctx, &[0, 1, 0, 1]);
        assert_eq!(sums.values(), &[40, 60]);

        let mins = run(agg::min::<T0>(), &NullGraph, &ctx, &[0, 1, 0, 1]);
        assert_eq!(mins.values(), &[10, 20]);
    }

    #[test]
    fn max_by_property() {
        let graph = MemoryGraph::new().with_vertex_property(PERSON, "age", vec![30i64, 25, 41]);
        let vertices =
            VertexSet::new(PERSON, vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)]);
        let ctx = Context::new(vertices);
        let maxes = run(agg::max_by::<T0, i64>("age"), &graph, &ctx, &[0, 0, 1]);
        assert_eq!(maxes.values(), &[30, 41]);
    }

    #[test]
    fn first_keeps_source_kind() {
        let vertices =
            VertexSet::new(PERSON, vec![VertexId::new(5), VertexId::new(6), VertexId::new(7)]);
        let ctx = Context::new(vertices);
        let firsts = run(agg::first::<T0>(), &NullGraph, &ctx, &[0, 0, 1]);
        assert_eq!(firsts.label(), PERSON);
        assert_eq!(firsts.iter().collect::<Vec<_>>(), vec![VertexId::new(5), VertexId::new(7)]);
    }

    #[test]
    fn to_list_preserves_input_order() {
        let ctx = Context::new(Collection::new(vec![10i64, 20, 30, 40, 50]));
        let lists = run(agg::to_list::<T0>(), &NullGraph, &ctx, &[0, 1, 0, 2, 1]);
        assert_eq!(lists.values(), &[vec![10, 30], vec![20, 50], vec![40]]);
    }

    #[test]
    fn to_set_dedups_within_group() {
        let ctx = Context::new(Collection::new(vec!["x", "y", "x", "z"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()));
        let sets = run(agg::to_set::<T0>(), &NullGraph, &ctx, &[0, 0, 0, 1]);
        assert_eq!(sets.values(), &[vec!["x".to_owned(), "y".to_owned()], vec!["z".to_owned()]]);
    }

    #[test]
    fn unknown_property_fails_before_the_scan() {
        let vertices = VertexSet::new(PERSON, vec![VertexId::new(0)]);
        let ctx = Context::new(vertices);
        let spec = agg::max_by::<T0, i64>("nope");
        assert!(spec.into_builder(&NullGraph, &ctx).is_err());
    }
}
