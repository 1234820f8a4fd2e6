//! Error types for the execution core.

use quiver_core::LabelId;
use thiserror::Error;

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that can occur while setting up or running an operator.
///
/// Every variant is fatal for the query fragment that raised it: the
/// execution core has no partial-result or retry mode. Violations of
/// internal invariants (misaligned column sizes, out-of-range rows) are
/// panics, not errors: they indicate a bug in the engine, not a bad plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The plan asked for a configuration the engine does not implement.
    #[error("unsupported plan configuration: {0}")]
    Unsupported(String),

    /// A fold was requested on a context that carries no sub-task scope.
    #[error("fold requires a sub-task scope on the input context")]
    MissingScope,

    /// A property named by the plan does not exist for the label.
    #[error("unknown property {property:?} for {label}")]
    UnknownProperty {
        /// The label the lookup ran against.
        label: LabelId,
        /// The requested property name.
        property: String,
    },

    /// A property exists but holds a different value type than requested.
    #[error("property {property:?} for {label} does not have the requested type")]
    PropertyType {
        /// The label the lookup ran against.
        label: LabelId,
        /// The requested property name.
        property: String,
    },
}
