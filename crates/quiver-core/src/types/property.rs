//! The typed universe of graph property values.

/// A type that can be stored as a vertex property.
///
/// Property columns are homogeneous: every value of a property for a given
/// label shares one of these types. The trait is sealed to the primitive
/// value types the storage layer understands; execution code is generic over
/// it so a property access resolves to a concrete column type at compile
/// time rather than through a per-row value enum.
pub trait PropertyValue: sealed::Sealed + Clone + std::fmt::Debug + Send + Sync + 'static {}

impl PropertyValue for i64 {}
impl PropertyValue for u64 {}
impl PropertyValue for f64 {}
impl PropertyValue for bool {}
impl PropertyValue for String {}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
    impl Sealed for String {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_property<T: PropertyValue>() {}

    #[test]
    fn primitive_types_are_property_values() {
        assert_property::<i64>();
        assert_property::<u64>();
        assert_property::<f64>();
        assert_property::<bool>();
        assert_property::<String>();
    }
}
