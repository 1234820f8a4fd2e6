//! Property-based tests for the grouping invariants.

use proptest::prelude::*;

use quiver_exec::agg;
use quiver_exec::group_by::{key, GroupByOp};
use quiver_exec::{Collection, Column, Context, NullGraph, T0, T1};

/// Rows of (key, value), small key space so collisions are common.
fn arb_rows() -> impl Strategy<Value = Vec<(u8, i64)>> {
    prop::collection::vec((0u8..6, -100i64..100), 0..200)
}

/// Distinct keys in first-seen order, computed the straightforward way.
fn discovery_order(keys: &[u8]) -> Vec<u8> {
    let mut seen = Vec::new();
    for &k in keys {
        if !seen.contains(&k) {
            seen.push(k);
        }
    }
    seen
}

proptest! {
    #[test]
    fn group_count_matches_distinct_keys(rows in arb_rows()) {
        let keys: Vec<u8> = rows.iter().map(|(k, _)| *k).collect();
        let expected = discovery_order(&keys);

        let ctx = Context::new(Collection::new(keys));
        let out = GroupByOp::group_by(&NullGraph, ctx, key::<T0>(), (agg::count::<T0>(),))
            .unwrap();

        prop_assert_eq!(out.len(), expected.len());
        prop_assert_eq!(out.column::<T0>().values(), expected.as_slice());
    }

    #[test]
    fn counts_conserve_rows(rows in arb_rows()) {
        let keys: Vec<u8> = rows.iter().map(|(k, _)| *k).collect();
        let total_rows = keys.len();

        let ctx = Context::new(Collection::new(keys));
        let out = GroupByOp::group_by(&NullGraph, ctx, key::<T0>(), (agg::count::<T0>(),))
            .unwrap();

        let total: u64 = out.head().iter().copied().sum();
        prop_assert_eq!(total as usize, total_rows);
    }

    #[test]
    fn to_list_partitions_values_in_input_order(rows in arb_rows()) {
        let keys: Vec<u8> = rows.iter().map(|(k, _)| *k).collect();
        let values: Vec<i64> = rows.iter().map(|(_, v)| *v).collect();
        let order = discovery_order(&keys);

        let ctx = Context::new(Collection::new(keys.clone()))
            .push(Collection::new(values.clone()));
        let out = GroupByOp::group_by(&NullGraph, ctx, key::<T0>(), (agg::to_list::<T1>(),))
            .unwrap();

        for (group, group_key) in order.iter().enumerate() {
            let expected: Vec<i64> = keys
                .iter()
                .zip(&values)
                .filter(|(k, _)| **k == *group_key)
                .map(|(_, v)| *v)
                .collect();
            prop_assert_eq!(out.head().get(group), &expected);
        }
    }

    #[test]
    fn two_key_columns_stay_lock_step(rows in arb_rows()) {
        let keys: Vec<u8> = rows.iter().map(|(k, _)| *k).collect();
        let values: Vec<i64> = rows.iter().map(|(_, v)| *v % 3).collect();

        let ctx = Context::new(Collection::new(keys.clone()))
            .push(Collection::new(values.clone()));
        let out = GroupByOp::group_by_pair(
            &NullGraph,
            ctx,
            (key::<T0>(), key::<T1>()),
            (agg::count::<T0>(),),
        )
        .unwrap();

        let k0 = out.column::<T0>();
        let k1 = out.column::<T1>();
        prop_assert_eq!(k0.len(), k1.len());

        // Each result row is a distinct pair, and every input pair appears.
        let result_pairs: Vec<(u8, i64)> =
            k0.iter().copied().zip(k1.iter().copied()).collect();
        let mut expected = Vec::new();
        for pair in keys.iter().copied().zip(values.iter().copied()) {
            if !expected.contains(&pair) {
                expected.push(pair);
            }
        }
        prop_assert_eq!(result_pairs, expected);
    }

    #[test]
    fn sum_matches_a_reference_fold(rows in arb_rows()) {
        let keys: Vec<u8> = rows.iter().map(|(k, _)| *k).collect();
        let values: Vec<i64> = rows.iter().map(|(_, v)| *v).collect();
        let order = discovery_order(&keys);

        let ctx = Context::new(Collection::new(keys.clone()))
            .push(Collection::new(values.clone()));
        let out = GroupByOp::group_by(&NullGraph, ctx, key::<T0>(), (agg::sum::<T1>(),))
            .unwrap();

        for (group, group_key) in order.iter().enumerate() {
            let expected: i64 = keys
                .iter()
                .zip(&values)
                .filter(|(k, _)| **k == *group_key)
                .map(|(_, v)| *v)
                .sum();
            prop_assert_eq!(*out.head().get(group), expected);
        }
    }
}
