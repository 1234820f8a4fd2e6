//! Row projections used by keys and aggregates.
//!
//! A selector says what part of a source row a key or aggregate consumes:
//! the row's index element itself, or one named property of the vertex it
//! refers to. Selectors are types, not runtime switches, so the combination
//! of source column, function, and selector resolves statically.

use std::marker::PhantomData;

/// Selects the row's index element as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

/// Selects one property of the row's vertex, as type `T`.
///
/// The property column is resolved through the graph accessor once, before
/// the scan; the label comes from the source vertex set.
#[derive(Debug, Clone)]
pub struct ByProperty<T> {
    property: String,
    _value: PhantomData<T>,
}

impl<T> ByProperty<T> {
    /// Creates a selector for the named property.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self { property: property.into(), _value: PhantomData }
    }

    /// Returns the property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }
}
