//! Wire constants of the expression bytecode.
//!
//! Conventions:
//! - Every node starts with a one-byte type tag.
//! - Multi-byte integers are little-endian.
//! - Operator children follow their header directly, depth-first, left to right.

pub const FC_EXPR_CONST32: u8 = 0x01; // tag, format, offset: i16, value: i32
pub const FC_EXPR_CONST64: u8 = 0x02; // tag, format, offset: i16, value: i64
pub const FC_EXPR_VAR: u8 = 0x03; // tag, format, offset: i16
pub const FC_EXPR_OPER: u8 = 0x04; // tag, operator, raw: i16, children...
pub const FC_EXPR_PAD: u8 = 0x05; // tag only

/// Size of an operator header, children excluded.
pub const OPERATOR_HEADER_SIZE: u64 = 4;
/// Size of a variable node.
pub const VARIABLE_SIZE: u64 = 4;
/// Size of a 32-bit constant node.
pub const CONST32_SIZE: u64 = 8;
/// Size of a 64-bit constant node.
pub const CONST64_SIZE: u64 = 12;
/// Size of one offset-table slot.
pub const OFFSET_TABLE_SLOT_SIZE: u64 = 2;

/// Node-type tag found in the first byte of every encoded expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum NodeTag {
    Const32 = FC_EXPR_CONST32,
    Const64 = FC_EXPR_CONST64,
    Variable = FC_EXPR_VAR,
    Operator = FC_EXPR_OPER,
    Pad = FC_EXPR_PAD,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_repr() {
        for byte in 1..=5u8 {
            let tag = NodeTag::from_repr(byte).unwrap();
            assert_eq!(tag as u8, byte);
        }
        assert_eq!(NodeTag::from_repr(0), None);
        assert_eq!(NodeTag::from_repr(6), None);
        assert_eq!(NodeTag::from_repr(0xff), None);
        assert_eq!(NodeTag::from_repr(FC_EXPR_OPER), Some(NodeTag::Operator));
        assert_eq!(NodeTag::Pad as u8, FC_EXPR_PAD);
    }
}
