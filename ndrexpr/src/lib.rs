//! ndrexpr: decoder for the expression bytecode embedded in NDR format strings.
//!
//! RPC and COM stubs describe array bounds, correlation descriptors and conformance or
//! variance values with small expressions compiled into the interface's format strings.
//! This crate turns those bytes back into an immutable [`node::ExpressionNode`] tree. It does
//! not evaluate the tree, nor re-encode it.
//!
//! Encoding shape
//!  - Every node starts with a one-byte type tag: 32-bit constant, 64-bit constant, variable
//!    or operator. See [`magic`].
//!  - Operators are followed by exactly `arity` child expressions, encoded the same way and
//!    placed consecutively (prefix order). The arity comes from [`operator::Operator::arity`].
//!  - Expressions are usually shared through an offset table of signed 16-bit entries; a
//!    negative entry means "no expression". See [`table`].
//!
//! Robustness
//!  - Unknown tags and operators decode to [`node::ExpressionNode::Invalid`] leaves instead of
//!    failing, so one odd sub-expression does not abort a whole table.
//!  - Truncated input is reported as [`error::ExprError::OutOfBounds`], and nesting is
//!    bounded by [`config::DecoderConfig::max_depth`].
//!
//! Example
//! ```
//! use ndrexpr::prelude::*;
//!
//! // Offset table with a single slot pointing at offset 0 of the buffer that follows it.
//! // The expression is `x + 1` where `x` lives at frame offset 8.
//! let image = [
//!     0x00, 0x00, // slot 0
//!     0x04, 0x0e, 0x08, 0x00, // operator plus
//!     0x03, 0x08, 0x08, 0x00, // variable at offset 8
//!     0x01, 0x08, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // constant 1
//! ];
//! let table = ExprTable::new(&image[..], Some(0), Some(2));
//! let expr = resolve_expression(&table, 0, &DecoderConfig::default()).unwrap();
//!
//! let plus = expr.try_as_operator_ref().unwrap();
//! assert_eq!(plus.operator(), Operator::Plus);
//! assert_eq!(plus.arguments()[0], ExpressionNode::variable(0x08, 8));
//! ```

/// Decoder settings.
pub mod config;
/// Structural error type shared by every module.
pub mod error;
/// Wire constants: node tags and fixed sizes.
pub mod magic;
/// Expression tree model.
pub mod node;
/// Operator codes and the arity table.
pub mod operator;
/// Recursive-descent parser.
pub mod parser;
/// Byte sources and the little-endian cursor.
pub mod source;
/// Stack-based operator binding for postfix callers.
pub mod stack;
/// Offset-table resolution.
pub mod table;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::config::DecoderConfig;
    pub use crate::error::{ExprError, ExprResult};
    pub use crate::node::{
        ConstantExpr, ConstantWidth, ExpressionNode, InvalidExpr, OperatorExpr, VariableExpr,
    };
    pub use crate::operator::{Arity, Operator, arity_of};
    pub use crate::parser::{parse_expression, parse_expression_at};
    pub use crate::source::{BasedSlice, ByteCursor, ByteSource};
    pub use crate::stack::{ExprStack, bind_operator};
    pub use crate::table::{ExprTable, ExpressionTable, resolve_expression, resolve_range};
}
