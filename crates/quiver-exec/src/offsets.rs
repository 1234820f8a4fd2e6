//! Per-aggregate offset tables.
//!
//! Aggregates like TO_LIST produce a variable number of underlying values
//! per group. When a group-by call runs more than one aggregate, the result
//! context carries an [`OffsetVector`]: one prefix-offset table per
//! aggregate, mapping a group index to the range of that aggregate's
//! underlying rows.

use std::ops::Range;

/// Prefix-offset tables aligning aggregate outputs with the key column.
///
/// Table `a` has `groups + 1` entries; group `g` of aggregate `a` covers
/// rows `tables[a][g] .. tables[a][g + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetVector {
    tables: Vec<Vec<usize>>,
}

impl OffsetVector {
    /// Builds offset tables from per-aggregate row multiplicities.
    ///
    /// Each inner vector gives, for one aggregate, the number of underlying
    /// rows each group produced.
    ///
    /// # Panics
    ///
    /// Panics if the aggregates disagree on the number of groups.
    #[must_use]
    pub fn from_group_rows(per_aggregate: Vec<Vec<usize>>) -> Self {
        let groups = per_aggregate.first().map_or(0, Vec::len);
        let tables = per_aggregate
            .into_iter()
            .map(|rows| {
                assert_eq!(rows.len(), groups, "aggregates disagree on group count");
                let mut offsets = Vec::with_capacity(rows.len() + 1);
                let mut total = 0usize;
                offsets.push(0);
                for count in rows {
                    total += count;
                    offsets.push(total);
                }
                offsets
            })
            .collect();
        Self { tables }
    }

    /// Returns the number of aggregates covered.
    #[must_use]
    pub fn aggregates(&self) -> usize {
        self.tables.len()
    }

    /// Returns the number of groups covered.
    #[must_use]
    pub fn groups(&self) -> usize {
        self.tables.first().map_or(0, |t| t.len() - 1)
    }

    /// Returns the underlying row range of group `group` in aggregate `agg`.
    #[must_use]
    pub fn range(&self, agg: usize, group: usize) -> Range<usize> {
        let table = &self.tables[agg];
        table[group]..table[group + 1]
    }

    /// Returns the total number of underlying rows of aggregate `agg`.
    #[must_use]
    pub fn total_rows(&self, agg: usize) -> usize {
        *self.tables[agg].last().unwrap_or(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_offsets_from_multiplicities() {
        let offsets = OffsetVector::from_group_rows(vec![vec![1, 1, 1], vec![2, 1, 2]]);
        assert_eq!(offsets.aggregates(), 2);
        assert_eq!(offsets.groups(), 3);

        assert_eq!(offsets.range(0, 0), 0..1);
        assert_eq!(offsets.range(0, 2), 2..3);
        assert_eq!(offsets.total_rows(0), 3);

        assert_eq!(offsets.range(1, 0), 0..2);
        assert_eq!(offsets.range(1, 1), 2..3);
        assert_eq!(offsets.range(1, 2), 3..5);
        assert_eq!(offsets.total_rows(1), 5);
    }

    #[test]
    fn empty_offsets() {
        let offsets = OffsetVector::from_group_rows(Vec::new());
        assert_eq!(offsets.aggregates(), 0);
        assert_eq!(offsets.groups(), 0);
    }

    #[test]
    #[should_panic(expected = "disagree on group count")]
    fn mismatched_group_counts_panic() {
        let _ = OffsetVector::from_group_rows(vec![vec![1, 2], vec![1]]);
    }
}
