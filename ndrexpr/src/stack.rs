//! Bottom-up construction of operator nodes from an operand stack.
//!
//! Callers decoding a flat postfix encoding push operands as they go and bind each operator
//! to the topmost `arity` nodes. Arguments come out in push order, which is the order the
//! operands appeared in the source, so a tree built here is identical to the one the
//! recursive parser produces for the same expression.
//!
//! ```
//! use ndrexpr::{node::ExpressionNode, operator::Operator, stack::ExprStack};
//!
//! let mut stack = ExprStack::new();
//! stack.push(ExpressionNode::constant32(0x08, 0, 6));
//! stack.push(ExpressionNode::constant32(0x08, 0, 2));
//! stack.apply(Operator::Slash, 0x08).unwrap();
//!
//! let node = stack.into_single().unwrap();
//! let values: Vec<_> = node
//!     .arguments()
//!     .iter()
//!     .map(|arg| arg.try_as_constant_ref().unwrap().value)
//!     .collect();
//! assert_eq!(values, vec![6, 2]);
//! ```
use std::collections::VecDeque;

use log::debug;
use smallvec::SmallVec;

use crate::{
    config::DecoderConfig,
    error::{ExprError, ExprResult},
    node::{ExpressionNode, InvalidExpr, OperatorExpr},
    operator::Operator,
};

/// Last-in-first-out sequence of already-built expression nodes.
///
/// Every entry remembers the height of its tree (a leaf has height 1), so binding can refuse
/// to build anything the recursive parser would reject under the same [`DecoderConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExprStack {
    entries: SmallVec<[(ExpressionNode, usize); 8]>,
    config: DecoderConfig,
}

impl ExprStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            entries: SmallVec::new(),
            config,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn push(&mut self, node: ExpressionNode) {
        let height = node.depth();
        self.entries.push((node, height));
    }

    pub fn pop(&mut self) -> Option<ExpressionNode> {
        self.entries.pop().map(|(node, _)| node)
    }

    pub fn peek(&self) -> Option<&ExpressionNode> {
        self.entries.last().map(|(node, _)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind `operator` to the top of the stack and push the result back.
    ///
    /// Returns a reference to the pushed node. See [`bind_operator`] for the binding rules.
    pub fn apply(&mut self, operator: Operator, raw_field: i16) -> ExprResult<&ExpressionNode> {
        let (node, height) = self.bind(operator, raw_field)?;
        self.entries.push((node, height));
        self.peek().ok_or(ExprError::UnbalancedStack { remaining: 0 })
    }

    /// Consume the stack, which must hold exactly one expression.
    pub fn into_single(mut self) -> ExprResult<ExpressionNode> {
        match self.entries.len() {
            1 => Ok(self.entries.remove(0).0),
            remaining => Err(ExprError::UnbalancedStack { remaining }),
        }
    }

    fn bind(&mut self, operator: Operator, raw_field: i16) -> ExprResult<(ExpressionNode, usize)> {
        let Some(arity) = operator.arity().count() else {
            debug!("Operator `{operator}` has no arity, binding as invalid");
            let node = ExpressionNode::Invalid(InvalidExpr::UnsupportedOperator {
                code: operator as u8,
                raw_field,
            });
            return Ok((node, 1));
        };

        let available = self.entries.len();
        if available < arity {
            return Err(ExprError::StackUnderflow {
                operator,
                needed: arity,
                available,
            });
        }

        // Root at depth 0, so a tree may be one level taller than `max_depth`
        let height = 1 + self.entries[available - arity..]
            .iter()
            .map(|&(_, height)| height)
            .max()
            .unwrap_or(0);
        if height > self.config.max_depth.saturating_add(1) {
            debug!("Operator `{operator}` would build a tree of height {height}, refusing");
            return Err(ExprError::TooDeep {
                limit: self.config.max_depth,
            });
        }

        let mut arguments = VecDeque::with_capacity(arity);
        for _ in 0..arity {
            if let Some(node) = self.pop() {
                arguments.push_front(node);
            }
        }

        let node = OperatorExpr::new(operator, raw_field, arguments.into())
            .map(ExpressionNode::Operator)?;
        Ok((node, height))
    }
}

impl FromIterator<ExpressionNode> for ExprStack {
    fn from_iter<I: IntoIterator<Item = ExpressionNode>>(iter: I) -> Self {
        let mut stack = Self::new();
        for node in iter {
            stack.push(node);
        }
        stack
    }
}

/// Pop `operator.arity()` nodes from `stack` and bind them as the operator's arguments.
///
/// The most recently pushed node is the last argument. An unsupported operator pops nothing
/// and yields [`ExpressionNode::Invalid`]. If the stack is too shallow, or the bound node would
/// nest deeper than the stack's [`DecoderConfig::max_depth`], the stack is left untouched and
/// [`ExprError::StackUnderflow`] or [`ExprError::TooDeep`] is returned.
pub fn bind_operator(
    stack: &mut ExprStack,
    operator: Operator,
    raw_field: i16,
) -> ExprResult<ExpressionNode> {
    stack.bind(operator, raw_field).map(|(node, _)| node)
}
