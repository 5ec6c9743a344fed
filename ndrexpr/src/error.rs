use strum::EnumIs;
use thiserror::Error;

use crate::operator::Operator;

/// Structural failures raised while decoding expressions.
///
/// Format surprises (unknown node tags, unsupported operators, empty offset-table
/// slots) are not errors: they decode to [`crate::node::ExpressionNode::Invalid`].
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum ExprError {
    /// A read ran past the bytes available in the source.
    #[error(
        "Read of {size} byte(s) at address {address:#x} is outside of the byte source ({len:#x} bytes available)."
    )]
    OutOfBounds { address: u64, size: usize, len: u64 },

    /// Base address plus offset does not fit in the address space.
    #[error("Address computation overflowed: base {base:#x} with offset {offset}.")]
    AddressOverflow { base: u64, offset: i64 },

    /// The expression nests deeper than the configured limit.
    #[error(
        "Expression is nested too deeply: the decoder refuses to descend past depth {limit}."
    )]
    TooDeep { limit: usize },

    /// An operator node was built with the wrong number of arguments.
    #[error(
        "Operator `{operator}` takes exactly {expected} argument(s), but {found} were supplied."
    )]
    ArityMismatch {
        operator: Operator,
        expected: usize,
        found: usize,
    },

    /// Not enough operands on the stack to bind an operator.
    #[error(
        "Operator `{operator}` needs {needed} operand(s) on the stack, but only {available} are available."
    )]
    StackUnderflow {
        operator: Operator,
        needed: usize,
        available: usize,
    },

    /// The operand stack did not fold down to a single expression.
    #[error("Expected exactly one expression left on the stack, found {remaining}.")]
    UnbalancedStack { remaining: usize },
}

pub type ExprResult<T> = Result<T, ExprError>;
