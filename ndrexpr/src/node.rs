//! Decoded expression trees.
//!
//! Role
//! - [`ExpressionNode`] is an exhaustive tagged union over the four node kinds the bytecode can
//!   describe. Consumers match on it instead of inspecting runtime types.
//! - Trees are immutable once built, own all their data, and hold no reference to the byte
//!   source they were decoded from; they are `Send + Sync` and may be shared freely.
//!
//! Invariants
//! - An [`ExpressionNode::Invalid`] node never has arguments.
//! - An [`OperatorExpr`] always carries exactly `operator.arity()` arguments, in the order
//!   they appear in the byte stream. [`OperatorExpr::new`] is the only way to build one.
use strum::{EnumIs, EnumTryAs};

use crate::{
    error::{ExprError, ExprResult},
    operator::Operator,
};

/// Why a node decoded to [`ExpressionNode::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidExpr {
    /// Empty offset-table slot, or the table itself is not present.
    Absent,
    /// Leading type tag not understood by this decoder (this includes padding).
    UnknownTag(u8),
    /// Operator header whose code has no known arity. Only its header was consumed.
    UnsupportedOperator { code: u8, raw_field: i16 },
}

/// Width of a constant literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantWidth {
    Bits32,
    Bits64,
}

impl ConstantWidth {
    pub fn bits(self) -> u32 {
        match self {
            ConstantWidth::Bits32 => 32,
            ConstantWidth::Bits64 => 64,
        }
    }
}

/// Integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantExpr {
    pub width: ConstantWidth,
    /// Format character describing the literal's base type.
    pub format: u8,
    /// Offset recorded by the compiler. Kept for diagnostics only.
    pub declared_offset: i16,
    /// Sign-extended value.
    pub value: i64,
}

/// Reference to a value in the call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableExpr {
    pub format: u8,
    /// Storage offset in the frame; interpreted by the evaluator, not here.
    pub offset: i16,
}

/// Operator applied to exactly `operator.arity()` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorExpr {
    operator: Operator,
    raw_field: i16,
    arguments: Vec<ExpressionNode>,
}

impl OperatorExpr {
    /// Build an operator node, checking the argument count against the arity table.
    ///
    /// Unsupported operators have no arity and are always rejected.
    pub fn new(
        operator: Operator,
        raw_field: i16,
        arguments: Vec<ExpressionNode>,
    ) -> ExprResult<Self> {
        let expected = operator.arity().count().unwrap_or(0);
        if operator.arity().count() != Some(arguments.len()) {
            return Err(ExprError::ArityMismatch {
                operator,
                expected,
                found: arguments.len(),
            });
        }

        Ok(Self {
            operator,
            raw_field,
            arguments,
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The 16-bit field following the operator code, verbatim.
    ///
    /// Some operators (casts in particular) store more than a format character here.
    pub fn raw_field(&self) -> i16 {
        self.raw_field
    }

    /// Format character: the low byte of [`Self::raw_field`].
    pub fn format(&self) -> u8 {
        self.raw_field as u8
    }

    pub fn arguments(&self) -> &[ExpressionNode] {
        &self.arguments
    }

    pub fn into_arguments(self) -> Vec<ExpressionNode> {
        self.arguments
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum ExpressionNode {
    Invalid(InvalidExpr),
    Constant(ConstantExpr),
    Variable(VariableExpr),
    Operator(OperatorExpr),
}

impl ExpressionNode {
    /// Sentinel for "no expression".
    pub const ABSENT: ExpressionNode = ExpressionNode::Invalid(InvalidExpr::Absent);

    pub fn constant32(format: u8, declared_offset: i16, value: i32) -> Self {
        ExpressionNode::Constant(ConstantExpr {
            width: ConstantWidth::Bits32,
            format,
            declared_offset,
            value: value as i64,
        })
    }

    pub fn constant64(format: u8, declared_offset: i16, value: i64) -> Self {
        ExpressionNode::Constant(ConstantExpr {
            width: ConstantWidth::Bits64,
            format,
            declared_offset,
            value,
        })
    }

    pub fn variable(format: u8, offset: i16) -> Self {
        ExpressionNode::Variable(VariableExpr { format, offset })
    }

    /// See [`OperatorExpr::new`].
    pub fn operator(
        operator: Operator,
        raw_field: i16,
        arguments: Vec<ExpressionNode>,
    ) -> ExprResult<Self> {
        OperatorExpr::new(operator, raw_field, arguments).map(ExpressionNode::Operator)
    }

    /// `false` exactly for [`ExpressionNode::Invalid`].
    pub fn is_valid(&self) -> bool {
        !self.is_invalid()
    }

    /// Children of an operator; empty for every other node.
    pub fn arguments(&self) -> &[ExpressionNode] {
        match self {
            ExpressionNode::Operator(op) => op.arguments(),
            ExpressionNode::Invalid(_)
            | ExpressionNode::Constant(_)
            | ExpressionNode::Variable(_) => &[],
        }
    }

    /// Format character carried by the node, if any.
    pub fn format(&self) -> Option<u8> {
        match self {
            ExpressionNode::Invalid(_) => None,
            ExpressionNode::Constant(c) => Some(c.format),
            ExpressionNode::Variable(v) => Some(v.format),
            ExpressionNode::Operator(op) => Some(op.format()),
        }
    }

    /// Pre-order traversal of this node and all of its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.arguments().iter().map(|child| (child, depth + 1)));
        }
        max
    }
}

impl Default for ExpressionNode {
    fn default() -> Self {
        Self::ABSENT
    }
}

/// Pre-order iterator returned by [`ExpressionNode::iter`].
///
/// Uses an explicit stack, so deep trees do not grow the call stack.
pub struct Iter<'a> {
    stack: Vec<&'a ExpressionNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ExpressionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the leftmost child is visited first
        self.stack.extend(node.arguments().iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a ExpressionNode {
    type Item = &'a ExpressionNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
