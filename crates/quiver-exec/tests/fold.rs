//! End-to-end tests for the key-less Fold operator.

use quiver_core::{LabelId, Tag, VertexId};
use quiver_exec::agg;
use quiver_exec::group_by::GroupByOp;
use quiver_exec::{Collection, Context, ExecError, NullGraph, VertexSet, T0, T1};

const PERSON: LabelId = LabelId::new(0);

#[test]
fn fold_reduces_a_whole_context_to_one_row() {
    let ctx = Context::new(Collection::new(vec![10i64, 20, 30]))
        .with_scope(Tag::new(0), vec![0, 0, 0]);

    let out = GroupByOp::fold(&NullGraph, ctx, (agg::count::<T0>(),)).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out.head().values(), &[3]);
    // Tag numbering continues past the input context.
    assert_eq!(out.base_tag(), Tag::new(1));
    assert_eq!(out.head_tag(), Tag::new(1));
}

#[test]
fn fold_groups_by_sub_task_scope() {
    // Two sub-tasks: rows 0-1 expand element 0, rows 2-4 expand element 1.
    let ctx = Context::new(Collection::new(vec![1i64, 2, 3, 4, 5]))
        .with_scope(Tag::new(0), vec![0, 0, 1, 1, 1]);

    let out = GroupByOp::fold(&NullGraph, ctx, (agg::sum::<T0>(),)).unwrap();

    assert_eq!(out.head().values(), &[3, 12]);
}

#[test]
fn fold_without_scope_is_an_unsupported_configuration() {
    let ctx = Context::new(Collection::new(vec![1i64]));
    let err = GroupByOp::fold(&NullGraph, ctx, (agg::count::<T0>(),)).unwrap_err();
    assert_eq!(err, ExecError::MissingScope);
}

#[test]
fn multi_aggregate_fold_builds_offsets() {
    let ctx = Context::new(Collection::new(vec![10i64, 20, 30, 40]))
        .with_scope(Tag::new(0), vec![0, 0, 1, 1]);

    let out =
        GroupByOp::fold(&NullGraph, ctx, (agg::count::<T0>(), agg::to_list::<T0>())).unwrap();

    assert_eq!(out.column::<T0>().values(), &[2, 2]);
    assert_eq!(out.column::<T1>().values(), &[vec![10, 20], vec![30, 40]]);
    assert_eq!(out.base_tag(), Tag::new(1));
    assert_eq!(out.head_tag(), Tag::new(2));

    let offsets = out.offsets().expect("multi-aggregate fold carries offsets");
    assert_eq!(offsets.aggregates(), 2);
    assert_eq!(offsets.range(1, 0), 0..2);
    assert_eq!(offsets.range(1, 1), 2..4);
}

#[test]
fn fold_over_a_multi_column_context() {
    let people = VertexSet::new(
        PERSON,
        vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)],
    );
    let ctx = Context::new(people)
        .push(Collection::new(vec![5i64, 6, 7]))
        .with_scope(Tag::new(0), vec![0, 0, 0]);

    let out = GroupByOp::fold(&NullGraph, ctx, (agg::count_distinct::<T0>(),)).unwrap();

    // Input occupied tags 0..=1, so the fold result starts at tag 2.
    assert_eq!(out.base_tag(), Tag::new(2));
    assert_eq!(out.head().values(), &[3]);
}
