//! Indented structural listing of decoded trees.
use std::fmt::Write;

use ndrexpr::node::{ConstantWidth, ExpressionNode, InvalidExpr};

fn write_node(out: &mut String, node: &ExpressionNode, indent: usize) -> std::fmt::Result {
    write!(out, "{:width$}", "", width = indent * 2)?;
    match node {
        ExpressionNode::Invalid(InvalidExpr::Absent) => writeln!(out, "invalid: absent"),
        ExpressionNode::Invalid(InvalidExpr::UnknownTag(tag)) => {
            writeln!(out, "invalid: unknown tag {tag:#04x}")
        }
        ExpressionNode::Invalid(InvalidExpr::UnsupportedOperator { code, raw_field }) => {
            writeln!(
                out,
                "invalid: unsupported operator {code:#04x} raw={:#06x}",
                *raw_field as u16
            )
        }
        ExpressionNode::Constant(c) => {
            let bits = match c.width {
                ConstantWidth::Bits32 => "const32",
                ConstantWidth::Bits64 => "const64",
            };
            writeln!(
                out,
                "{bits} {} fc={:#04x} offset={}",
                c.value, c.format, c.declared_offset
            )
        }
        ExpressionNode::Variable(v) => {
            writeln!(out, "var fc={:#04x} offset={}", v.format, v.offset)
        }
        ExpressionNode::Operator(op) => {
            writeln!(
                out,
                "op {} ({}) fc={:#04x} raw={:#06x}",
                op.operator(),
                op.operator().class(),
                op.format(),
                op.raw_field() as u16
            )?;
            for arg in op.arguments() {
                write_node(out, arg, indent + 1)?;
            }
            Ok(())
        }
    }
}

/// Render `node` one line per sub-expression, children indented under their operator.
pub fn render(node: &ExpressionNode) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_node(&mut out, node, 0);
    out
}
