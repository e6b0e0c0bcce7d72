//! Error taxonomy for wrapper operations.

use core::fmt;

use crate::value::ValueKind;

/// Errors produced by access, coercion, and operator delegation on a
/// [`Node`](crate::Node).
///
/// Nothing is swallowed or retried internally: every failure propagates
/// synchronously to the caller. The one exception is boolean coercion
/// ([`Node::to_bool`](crate::Node::to_bool)), which never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The requested attribute/index/container operation is invalid for the
    /// wrapped value's runtime kind.
    NotSupported {
        /// Name of the operation that was attempted.
        operation: &'static str,
        /// Runtime kind of the wrapped value.
        kind: ValueKind,
    },

    /// A sequence index fell outside the valid range.
    OutOfBounds {
        /// The offending index, as given by the caller.
        index: i64,
        /// The sequence's current length.
        len: usize,
    },

    /// A coercion between the wrapped value and a primitive type cannot be
    /// performed.
    Conversion {
        /// Runtime kind of the source value.
        from: ValueKind,
        /// Name of the requested target type.
        to: &'static str,
    },

    /// An arithmetic/comparison/unary operator cannot be applied to its
    /// operands.
    Operation {
        /// The operator symbol.
        operator: &'static str,
        /// Runtime kind of the left (or sole) operand.
        lhs: ValueKind,
        /// Runtime kind of the right operand; `None` for unary operators.
        rhs: Option<ValueKind>,
    },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::NotSupported { operation, kind } => {
                write!(f, "{operation} is not supported on `{kind}`")
            }
            NodeError::OutOfBounds { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            NodeError::Conversion { from, to } => {
                write!(f, "cannot convert `{from}` to {to}")
            }
            NodeError::Operation {
                operator,
                lhs,
                rhs: Some(rhs),
            } => {
                write!(f, "operator `{operator}` is not supported between `{lhs}` and `{rhs}`")
            }
            NodeError::Operation { operator, lhs, rhs: None } => {
                write!(f, "unary operator `{operator}` is not supported on `{lhs}`")
            }
        }
    }
}

impl core::error::Error for NodeError {}
