//! Execution contexts: ordered, typed products of columns.
//!
//! A context is the unit of data flowing between operators. Its shape is
//! fixed at compile time: a head column `H` (the most recent result) plus a
//! tuple `P` of the previous columns, oldest first. Rows are index-aligned
//! across all columns.
//!
//! Columns are addressed two ways:
//!
//! - by *position marker* ([`T0`]..[`T5`]), resolved at compile time through
//!   [`ColumnAt`]; this is how keys and aggregates name their source column;
//! - by [`Tag`], runtime metadata for diagnostics: a column's tag is
//!   `base_tag + position`.
//!
//! A context is consumed by value by exactly one downstream operator; the
//! operator that produces a new context owns all its columns.

use quiver_core::Tag;

use crate::column::Column;
use crate::offsets::OffsetVector;

/// The sub-task scope of a context.
///
/// When a context was produced by expanding the column at `start_tag` (one
/// input row fanning out to several result rows), the scope records, per
/// row, the position of the originating element in that column. Fold groups
/// rows by this.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scope {
    start_tag: Tag,
    offsets: Vec<usize>,
}

/// An execution context with head column `H` and previous columns `P`.
#[derive(Debug, Clone)]
pub struct Context<H, P = ()> {
    head: H,
    prev: P,
    base_tag: Tag,
    head_tag: Tag,
    scope: Option<Scope>,
    offsets: Option<OffsetVector>,
}

impl<H: Column> Context<H> {
    /// Creates a single-column context with tags starting at 0.
    #[must_use]
    pub fn new(head: H) -> Self {
        Self::with_base(head, Tag::new(0))
    }

    /// Creates a single-column context with tags starting at `base_tag`.
    #[must_use]
    pub fn with_base(head: H, base_tag: Tag) -> Self {
        Self { head, prev: (), base_tag, head_tag: base_tag, scope: None, offsets: None }
    }
}

impl<H: Column, P> Context<H, P> {
    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len()
    }

    /// Returns true if the context has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    /// Returns the head column.
    #[must_use]
    pub fn head(&self) -> &H {
        &self.head
    }

    /// Returns the tag of the leftmost column.
    #[must_use]
    pub const fn base_tag(&self) -> Tag {
        self.base_tag
    }

    /// Returns the tag of the head column.
    #[must_use]
    pub const fn head_tag(&self) -> Tag {
        self.head_tag
    }

    /// Returns the column selected by position marker `Tm`.
    #[must_use]
    pub fn column<Tm: ColumnAt<Self>>(&self) -> &Tm::Col {
        Tm::column(self)
    }

    /// Returns the tag of the column selected by position marker `Tm`.
    #[must_use]
    pub fn tag_of<Tm: ColumnAt<Self>>(&self) -> Tag {
        self.base_tag.offset(Tm::POSITION as u32)
    }

    /// Attaches a sub-task scope: rows grouped by the element of the column
    /// at `start_tag` they originate from.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is not row-aligned with the context.
    #[must_use]
    pub fn with_scope(mut self, start_tag: Tag, offsets: Vec<usize>) -> Self {
        assert_eq!(offsets.len(), self.len(), "scope offsets must be row-aligned");
        self.scope = Some(Scope { start_tag, offsets });
        self
    }

    /// Returns the sub-task scope, if any.
    #[must_use]
    pub fn scope(&self) -> Option<(Tag, &[usize])> {
        self.scope.as_ref().map(|s| (s.start_tag, s.offsets.as_slice()))
    }

    /// Attaches per-aggregate offset tables.
    #[must_use]
    pub fn with_offsets(mut self, offsets: OffsetVector) -> Self {
        self.offsets = Some(offsets);
        self
    }

    /// Returns the per-aggregate offset tables, if any.
    #[must_use]
    pub fn offsets(&self) -> Option<&OffsetVector> {
        self.offsets.as_ref()
    }

    /// Appends a column, which becomes the new head.
    ///
    /// Tag metadata shifts with it: the new head's tag is the old head's
    /// tag plus one.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not row-aligned with the context.
    #[must_use]
    pub fn push<N: Column>(self, column: N) -> Context<N, P::Out>
    where
        P: TuplePush<H>,
    {
        assert_eq!(column.len(), self.len(), "pushed column must be row-aligned");
        Context {
            head: column,
            prev: self.prev.push(self.head),
            base_tag: self.base_tag,
            head_tag: self.head_tag.offset(1),
            scope: self.scope,
            offsets: self.offsets,
        }
    }
}

/// Row-level view of a context, independent of its column types.
///
/// Operator plumbing that only needs row counts and tag metadata bounds on
/// this instead of spelling out the full context shape.
pub trait RowSet {
    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns the tag of the head (rightmost) column.
    fn max_tag(&self) -> Tag;

    /// Returns the sub-task scope, if any.
    fn scope(&self) -> Option<(Tag, &[usize])>;
}

impl<H: Column, P> RowSet for Context<H, P> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn max_tag(&self) -> Tag {
        self.head_tag
    }

    fn scope(&self) -> Option<(Tag, &[usize])> {
        Context::scope(self)
    }
}

/// Appends a value to the end of a tuple.
pub trait TuplePush<H> {
    /// The tuple with `H` appended.
    type Out;

    /// Appends `head`.
    fn push(self, head: H) -> Self::Out;
}

macro_rules! impl_tuple_push {
    ($(($($P:ident : $idx:tt),*)),* $(,)?) => {
        $(
            impl<H $(, $P)*> TuplePush<H> for ($($P,)*) {
                type Out = ($($P,)* H,);

                fn push(self, head: H) -> Self::Out {
                    ($(self.$idx,)* head,)
                }
            }
        )*
    };
}

impl_tuple_push!(
    (),
    (P0: 0),
    (P0: 0, P1: 1),
    (P0: 0, P1: 1, P2: 2),
    (P0: 0, P1: 1, P2: 2, P3: 3),
    (P0: 0, P1: 1, P2: 2, P3: 3, P4: 4),
);

/// Resolves a position marker to a concrete column of context `C`.
///
/// Implemented for each marker on each context shape, so a key or aggregate
/// spec written against marker `Tm` picks its source column at compile time.
pub trait ColumnAt<C> {
    /// The column type at this position.
    type Col: Column;

    /// The zero-based position of the column.
    const POSITION: usize;

    /// Returns the column.
    fn column(ctx: &C) -> &Self::Col;
}

/// Position marker for column 0.
#[derive(Debug, Clone, Copy)]
pub struct T0;
/// Position marker for column 1.
#[derive(Debug, Clone, Copy)]
pub struct T1;
/// Position marker for column 2.
#[derive(Debug, Clone, Copy)]
pub struct T2;
/// Position marker for column 3.
#[derive(Debug, Clone, Copy)]
pub struct T3;
/// Position marker for column 4.
#[derive(Debug, Clone, Copy)]
pub struct T4;
/// Position marker for column 5.
#[derive(Debug, Clone, Copy)]
pub struct T5;

macro_rules! impl_column_at_head {
    ($Tm:ident, $pos:expr, ($($P:ident),*)) => {
        impl<H: Column $(, $P)*> ColumnAt<Context<H, ($($P,)*)>> for $Tm {
            type Col = H;
            const POSITION: usize = $pos;

            fn column(ctx: &Context<H, ($($P,)*)>) -> &H {
                &ctx.head
            }
        }
    };
}

macro_rules! impl_column_at_prev {
    ($Tm:ident, $pos:expr, $idx:tt, ($($P:ident),*), $Sel:ident) => {
        impl<H $(, $P)*> ColumnAt<Context<H, ($($P,)*)>> for $Tm
        where
            $Sel: Column,
        {
            type Col = $Sel;
            const POSITION: usize = $pos;

            fn column(ctx: &Context<H, ($($P,)*)>) -> &$Sel {
                &ctx.prev.$idx
            }
        }
    };
}

impl_column_at_head!(T0, 0, ());

impl_column_at_prev!(T0, 0, 0, (P0), P0);
impl_column_at_head!(T1, 1, (P0));

impl_column_at_prev!(T0, 0, 0, (P0, P1), P0);
impl_column_at_prev!(T1, 1, 1, (P0, P1), P1);
impl_column_at_head!(T2, 2, (P0, P1));

impl_column_at_prev!(T0, 0, 0, (P0, P1, P2), P0);
impl_column_at_prev!(T1, 1, 1, (P0, P1, P2), P1);
impl_column_at_prev!(T2, 2, 2, (P0, P1, P2), P2);
impl_column_at_head!(T3, 3, (P0, P1, P2));

impl_column_at_prev!(T0, 0, 0, (P0, P1, P2, P3), P0);
impl_column_at_prev!(T1, 1, 1, (P0, P1, P2, P3), P1);
impl_column_at_prev!(T2, 2, 2, (P0, P1, P2, P3), P2);
impl_column_at_prev!(T3, 3, 3, (P0, P1, P2, P3), P3);
impl_column_at_head!(T4, 4, (P0, P1, P2, P3));

impl_column_at_prev!(T0, 0, 0, (P0, P1, P2, P3, P4), P0);
impl_column_at_prev!(T1, 1, 1, (P0, P1, P2, P3, P4), P1);
impl_column_at_prev!(T2, 2, 2, (P0, P1, P2, P3, P4), P2);
impl_column_at_prev!(T3, 3, 3, (P0, P1, P2, P3, P4), P3);
impl_column_at_prev!(T4, 4, 4, (P0, P1, P2, P3, P4), P4);
impl_column_at_head!(T5, 5, (P0, P1, P2, P3, P4));

#[cfg(test)]
mod tests {
    use quiver_core::{LabelId, VertexId};

    use crate::column::{Collection, VertexSet};

    use super::*;

    const PERSON: LabelId = LabelId::new(0);

    #[test]
    fn single_column_context() {
        let ctx = Context::new(Collection::new(vec![1i64, 2, 3]));
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.base_tag(), Tag::new(0));
        assert_eq!(ctx.head_tag(), Tag::new(0));
        assert_eq!(ctx.column::<T0>().values(), &[1, 2, 3]);
    }

    #[test]
    fn push_shifts_head_and_tags() {
        let vertices = VertexSet::new(PERSON, vec![VertexId::new(10), VertexId::new(11)]);
        let ctx = Context::new(vertices).push(Collection::new(vec!["x".to_owned(), "y".to_owned()]));

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.head_tag(), Tag::new(1));
        assert_eq!(*ctx.column::<T0>().get(0), VertexId::new(10));
        assert_eq!(ctx.column::<T1>().values(), &["x".to_owned(), "y".to_owned()]);
        assert_eq!(ctx.tag_of::<T0>(), Tag::new(0));
        assert_eq!(ctx.tag_of::<T1>(), Tag::new(1));
    }

    #[test]
    fn base_tag_offsets_positions() {
        let ctx = Context::with_base(Collection::new(vec![1u64]), Tag::new(3))
            .push(Collection::new(vec![2u64]));
        assert_eq!(ctx.base_tag(), Tag::new(3));
        assert_eq!(ctx.head_tag(), Tag::new(4));
        assert_eq!(ctx.tag_of::<T1>(), Tag::new(4));
    }

    #[test]
    fn scope_roundtrip() {
        let ctx = Context::new(Collection::new(vec![1i64, 2, 3]))
            .with_scope(Tag::new(0), vec![0, 0, 1]);
        let (tag, offsets) = ctx.scope().unwrap();
        assert_eq!(tag, Tag::new(0));
        assert_eq!(offsets, &[0, 0, 1]);
    }

    #[test]
    fn scope_survives_push() {
        let ctx = Context::new(Collection::new(vec![1i64, 2]))
            .with_scope(Tag::new(0), vec![0, 1])
            .push(Collection::new(vec![true, false]));
        assert!(ctx.scope().is_some());
    }

    #[test]
    #[should_panic(expected = "row-aligned")]
    fn misaligned_push_panics() {
        let _ = Context::new(Collection::new(vec![1i64, 2]))
            .push(Collection::new(vec![1i64]));
    }

    #[test]
    #[should_panic(expected = "row-aligned")]
    fn misaligned_scope_panics() {
        let _ = Context::new(Collection::new(vec![1i64, 2])).with_scope(Tag::new(0), vec![0]);
    }
}
