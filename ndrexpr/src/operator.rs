//! Operator codes and the static arity table.
//!
//! The arity table is the single source of truth for how many child expressions follow an
//! operator header. It is pure data: nothing here depends on parser state.
//!
//! ```
//! use ndrexpr::operator::{Arity, Operator, arity_of};
//!
//! assert_eq!(Operator::Plus.arity(), Arity::Binary);
//! assert_eq!(arity_of(Operator::Conditional as u8).count(), Some(3));
//! assert_eq!(arity_of(0xee), Arity::Unsupported);
//! ```
use strum::{EnumIter, FromRepr};

/// Number of operand sub-expressions an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
    Ternary,
    /// The decoder cannot tell how many bytes follow such an operator.
    Unsupported,
}

impl Arity {
    /// Number of children, or `None` for [`Arity::Unsupported`].
    pub fn count(self) -> Option<usize> {
        match self {
            Arity::Unary => Some(1),
            Arity::Binary => Some(2),
            Arity::Ternary => Some(3),
            Arity::Unsupported => None,
        }
    }

    pub fn is_supported(self) -> bool {
        self != Arity::Unsupported
    }
}

/// Operator codes, numbered as the MIDL compiler emits them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Operator {
    // Unary
    UnaryPlus = 0x01,
    UnaryMinus = 0x02,
    UnaryNot = 0x03,
    UnaryComplement = 0x04,
    UnaryIndirection = 0x05,
    UnaryCast = 0x06,
    /// Address-of (`&x`).
    UnaryAnd = 0x07,
    UnarySizeof = 0x08,
    UnaryAlignof = 0x09,
    PreIncr = 0x0a,
    PreDecr = 0x0b,
    PostIncr = 0x0c,
    PostDecr = 0x0d,

    // Binary arithmetic
    Plus = 0x0e,
    Minus = 0x0f,
    Star = 0x10,
    Slash = 0x11,
    Mod = 0x12,
    LeftShift = 0x13,
    RightShift = 0x14,

    // Binary relational
    Less = 0x15,
    LessEqual = 0x16,
    GreaterEqual = 0x17,
    Greater = 0x18,
    Equal = 0x19,
    NotEqual = 0x1a,

    // Binary bitwise
    And = 0x1b,
    Or = 0x1c,
    Xor = 0x1d,

    // Binary logical
    LogicalAnd = 0x1e,
    LogicalOr = 0x1f,

    // Compiler internal, never valid in a format string
    Function = 0x20,
    Param = 0x21,
    PointsTo = 0x22,
    Dot = 0x23,
    Index = 0x24,
    Comma = 0x25,
    Stmt = 0x26,
    Assign = 0x27,
    AsyncSplit = 0x28,
    CorrPointer = 0x29,
    CorrTopLevel = 0x2a,

    // Ternary
    /// `cond ? a : b`
    Conditional = 0x2b,
    Colon = 0x2c,
}

/// Coarse grouping of operators, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum OperatorClass {
    Unary,
    Arithmetic,
    Shift,
    Relational,
    Bitwise,
    Logical,
    Conditional,
    Internal,
}

impl Operator {
    /// Static arity of this operator.
    pub fn arity(self) -> Arity {
        use Operator::*;
        match self {
            UnaryPlus | UnaryMinus | UnaryNot | UnaryComplement | UnaryIndirection | UnaryCast
            | UnaryAnd | UnarySizeof | UnaryAlignof => Arity::Unary,

            Minus | Mod | Or | Plus | Slash | Star | Xor | And | LeftShift | RightShift
            | Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual | LogicalAnd
            | LogicalOr => Arity::Binary,

            Conditional => Arity::Ternary,

            PreIncr | PreDecr | PostIncr | PostDecr | Function | Param | PointsTo | Dot
            | Index | Comma | Stmt | Assign | AsyncSplit | CorrPointer | CorrTopLevel
            | Colon => Arity::Unsupported,
        }
    }

    pub fn class(self) -> OperatorClass {
        use Operator::*;
        match self {
            UnaryPlus | UnaryMinus | UnaryNot | UnaryComplement | UnaryIndirection | UnaryCast
            | UnaryAnd | UnarySizeof | UnaryAlignof | PreIncr | PreDecr | PostIncr
            | PostDecr => OperatorClass::Unary,
            Plus | Minus | Star | Slash | Mod => OperatorClass::Arithmetic,
            LeftShift | RightShift => OperatorClass::Shift,
            Less | LessEqual | GreaterEqual | Greater | Equal | NotEqual => {
                OperatorClass::Relational
            }
            And | Or | Xor => OperatorClass::Bitwise,
            LogicalAnd | LogicalOr => OperatorClass::Logical,
            Conditional => OperatorClass::Conditional,
            Function | Param | PointsTo | Dot | Index | Comma | Stmt | Assign | AsyncSplit
            | CorrPointer | CorrTopLevel | Colon => OperatorClass::Internal,
        }
    }
}

/// Arity of a raw operator byte. Codes outside of [`Operator`] are unsupported.
pub fn arity_of(code: u8) -> Arity {
    Operator::from_repr(code)
        .map(Operator::arity)
        .unwrap_or(Arity::Unsupported)
}
