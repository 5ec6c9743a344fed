#![allow(dead_code)]

use ndrexpr::magic::{FC_EXPR_CONST32, FC_EXPR_CONST64, FC_EXPR_OPER, FC_EXPR_PAD, FC_EXPR_VAR};
use ndrexpr::node::{ConstantWidth, ExpressionNode, InvalidExpr};

/// Test-only writer for the expression bytecode.
#[derive(Default)]
pub struct Bytecode {
    pub bytes: Vec<u8>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn const32(mut self, format: u8, offset: i16, value: i32) -> Self {
        self.bytes.extend([FC_EXPR_CONST32, format]);
        self.bytes.extend(offset.to_le_bytes());
        self.bytes.extend(value.to_le_bytes());
        self
    }

    pub fn const64(mut self, format: u8, offset: i16, value: i64) -> Self {
        self.bytes.extend([FC_EXPR_CONST64, format]);
        self.bytes.extend(offset.to_le_bytes());
        self.bytes.extend(value.to_le_bytes());
        self
    }

    pub fn var(mut self, format: u8, offset: i16) -> Self {
        self.bytes.extend([FC_EXPR_VAR, format]);
        self.bytes.extend(offset.to_le_bytes());
        self
    }

    pub fn op(mut self, code: u8, raw_field: i16) -> Self {
        self.bytes.extend([FC_EXPR_OPER, code]);
        self.bytes.extend(raw_field.to_le_bytes());
        self
    }

    pub fn pad(mut self) -> Self {
        self.bytes.push(FC_EXPR_PAD);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Append `node` depth-first, the way a compiler lays it out.
    pub fn node(mut self, node: &ExpressionNode) -> Self {
        match node {
            ExpressionNode::Invalid(InvalidExpr::UnknownTag(tag)) => self.raw(&[*tag]),
            ExpressionNode::Invalid(InvalidExpr::UnsupportedOperator { code, raw_field }) => {
                self.op(*code, *raw_field)
            }
            ExpressionNode::Invalid(InvalidExpr::Absent) => {
                panic!("absent expressions have no encoding")
            }
            ExpressionNode::Constant(c) => match c.width {
                ConstantWidth::Bits32 => self.const32(c.format, c.declared_offset, c.value as i32),
                ConstantWidth::Bits64 => self.const64(c.format, c.declared_offset, c.value),
            },
            ExpressionNode::Variable(v) => self.var(v.format, v.offset),
            ExpressionNode::Operator(op) => {
                self = self.op(op.operator() as u8, op.raw_field());
                for arg in op.arguments() {
                    self = self.node(arg);
                }
                self
            }
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Lay out an offset table followed by an expression buffer.
///
/// Returns the image together with the buffer base; the table starts at 0.
pub struct ImageBuilder {
    slots: Vec<i16>,
    buffer: Vec<u8>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            buffer: Vec::new(),
        }
    }

    /// Add an expression to the buffer and a slot pointing at it.
    pub fn expression(mut self, bytes: &[u8]) -> Self {
        self.slots.push(self.buffer.len() as i16);
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Add a slot with an arbitrary stored value.
    pub fn slot(mut self, value: i16) -> Self {
        self.slots.push(value);
        self
    }

    pub fn build(self) -> (Vec<u8>, u64) {
        let mut image: Vec<u8> = self.slots.iter().flat_map(|s| s.to_le_bytes()).collect();
        let buffer_base = image.len() as u64;
        image.extend(self.buffer);
        (image, buffer_base)
    }
}

pub const FC_LONG: u8 = 0x08;
pub const FC_HYPER: u8 = 0x0b;

pub fn c32(value: i32) -> ExpressionNode {
    ExpressionNode::constant32(FC_LONG, 0, value)
}
