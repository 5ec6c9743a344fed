//! Recursive-descent decoder for a single encoded expression.
//!
//! Each call reads one node header, dispatches on its type tag and, for operators, recurses
//! exactly `arity` times. Consumption is fully determined by the bytes read so far; there is
//! no lookahead. Nesting is bounded by [`DecoderConfig::max_depth`].
use log::{debug, trace};

use crate::{
    config::DecoderConfig,
    error::{ExprError, ExprResult},
    magic::NodeTag,
    node::{ExpressionNode, InvalidExpr, OperatorExpr},
    operator::Operator,
    source::{ByteCursor, ByteSource},
};

/// Decode one expression starting at the cursor position.
///
/// On success the cursor sits immediately past the bytes of the node and its whole subtree.
/// Unknown tags and unsupported operators decode to [`ExpressionNode::Invalid`]; only
/// structural problems (truncated source, excessive nesting) are reported as errors.
///
/// ```
/// use ndrexpr::{config::DecoderConfig, parser::parse_expression, source::ByteCursor};
///
/// // Variable, format 0x08, frame offset 16
/// let bytes = [0x03u8, 0x08, 0x10, 0x00];
/// let mut cursor = ByteCursor::new(&bytes[..], 0);
/// let node = parse_expression(&mut cursor, &DecoderConfig::default()).unwrap();
/// assert_eq!(node.try_as_variable().unwrap().offset, 16);
/// assert_eq!(cursor.position(), 4);
/// ```
pub fn parse_expression<S: ByteSource + ?Sized>(
    cursor: &mut ByteCursor<'_, S>,
    config: &DecoderConfig,
) -> ExprResult<ExpressionNode> {
    parse_node(cursor, config, 0)
}

/// Decode one expression located at an absolute `address` of `source`.
pub fn parse_expression_at<S: ByteSource + ?Sized>(
    source: &S,
    address: u64,
    config: &DecoderConfig,
) -> ExprResult<ExpressionNode> {
    let mut cursor = ByteCursor::new(source, address);
    parse_expression(&mut cursor, config)
}

fn parse_node<S: ByteSource + ?Sized>(
    cursor: &mut ByteCursor<'_, S>,
    config: &DecoderConfig,
    depth: usize,
) -> ExprResult<ExpressionNode> {
    if depth > config.max_depth {
        return Err(ExprError::TooDeep {
            limit: config.max_depth,
        });
    }

    let start = cursor.position();
    let tag = cursor.read_u8()?;

    let node = match NodeTag::from_repr(tag) {
        Some(NodeTag::Const32) => {
            let format = cursor.read_u8()?;
            let declared_offset = cursor.read_i16()?;
            let value = cursor.read_i32()?;
            ExpressionNode::constant32(format, declared_offset, value)
        }
        Some(NodeTag::Const64) => {
            let format = cursor.read_u8()?;
            let declared_offset = cursor.read_i16()?;
            let value = cursor.read_i64()?;
            ExpressionNode::constant64(format, declared_offset, value)
        }
        Some(NodeTag::Variable) => {
            let format = cursor.read_u8()?;
            let offset = cursor.read_i16()?;
            ExpressionNode::variable(format, offset)
        }
        Some(NodeTag::Operator) => parse_operator(cursor, config, depth, start)?,
        Some(NodeTag::Pad) | None => {
            debug!("Untyped expression tag {tag:#04x} at {start:#x}, decoding as invalid");
            ExpressionNode::Invalid(InvalidExpr::UnknownTag(tag))
        }
    };

    trace!("Decoded {} at {start:#x} (depth {depth})", summary(&node));
    Ok(node)
}

fn parse_operator<S: ByteSource + ?Sized>(
    cursor: &mut ByteCursor<'_, S>,
    config: &DecoderConfig,
    depth: usize,
    start: u64,
) -> ExprResult<ExpressionNode> {
    let code = cursor.read_u8()?;
    let raw_field = cursor.read_i16()?;

    // Without an arity we cannot know how many bytes belong to this operator, so stop here
    let Some((operator, arity)) = Operator::from_repr(code)
        .and_then(|operator| operator.arity().count().map(|arity| (operator, arity)))
    else {
        debug!("Unsupported expression operator {code:#04x} at {start:#x}, decoding as invalid");
        return Ok(ExpressionNode::Invalid(InvalidExpr::UnsupportedOperator {
            code,
            raw_field,
        }));
    };

    let mut arguments = Vec::with_capacity(arity);
    for _ in 0..arity {
        arguments.push(parse_node(cursor, config, depth + 1)?);
    }

    OperatorExpr::new(operator, raw_field, arguments).map(ExpressionNode::Operator)
}

/// One-line description of `node` itself, children left out.
fn summary(node: &ExpressionNode) -> String {
    match node {
        ExpressionNode::Invalid(reason) => format!("invalid node ({reason:?})"),
        ExpressionNode::Constant(constant) => {
            format!("{}-bit constant {}", constant.width.bits(), constant.value)
        }
        ExpressionNode::Variable(variable) => format!("variable at offset {}", variable.offset),
        ExpressionNode::Operator(operator) => format!(
            "operator `{}` with {} arguments",
            operator.operator(),
            operator.arguments().len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(bytes: &[u8]) -> (ExprResult<ExpressionNode>, u64) {
        let mut cursor = ByteCursor::new(bytes, 0);
        let result = parse_expression(&mut cursor, &DecoderConfig::default());
        (result, cursor.position())
    }

    #[test]
    fn const32_all_ones_is_minus_one() {
        let (node, pos) = parse(&[0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff]);
        let constant = node.unwrap().try_as_constant().unwrap();
        assert_eq!(constant.value, -1);
        assert_eq!(constant.width.bits(), 32);
        assert_eq!(pos, 8);
    }

    #[test]
    fn pad_consumes_only_its_tag() {
        let (node, pos) = parse(&[0x05, 0x04, 0x0e, 0x00]);
        assert_eq!(
            node.unwrap(),
            ExpressionNode::Invalid(InvalidExpr::UnknownTag(0x05))
        );
        assert_eq!(pos, 1);
    }

    #[test]
    fn unsupported_operator_consumes_only_its_header() {
        // Trailing bytes would be a valid constant; they must not be read
        let (node, pos) = parse(&[0x04, 0x29, 0x34, 0x12, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(
            node.unwrap(),
            ExpressionNode::Invalid(InvalidExpr::UnsupportedOperator {
                code: 0x29,
                raw_field: 0x1234
            })
        );
        assert_eq!(pos, 4);
    }

    #[test]
    fn truncated_operand_is_a_structural_error() {
        // Unary minus whose operand is cut after the tag
        let (node, _) = parse(&[0x04, 0x02, 0x08, 0x00, 0x03, 0x08]);
        assert!(node.unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn depth_limit_is_enforced() {
        // -(-(-(x)))
        let bytes = [
            0x04, 0x02, 0x08, 0x00, 0x04, 0x02, 0x08, 0x00, 0x04, 0x02, 0x08, 0x00, 0x03, 0x08,
            0x00, 0x00,
        ];
        let config = DecoderConfig::default().with_max_depth(2);
        let err = parse_expression_at(&bytes[..], 0, &config).unwrap_err();
        assert_eq!(err, ExprError::TooDeep { limit: 2 });

        let config = DecoderConfig::default().with_max_depth(3);
        let node = parse_expression_at(&bytes[..], 0, &config).unwrap();
        assert_eq!(node.depth(), 4);
    }

    #[test]
    fn unsupported_operator_after_leading_bytes_is_still_invalid() {
        // Two bytes of an unrelated node precede the operator header
        let bytes = [0xaa, 0xbb, 0x04, 0x2c, 0x00, 0x00, 0x03, 0x08, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&bytes[..], 2);
        let node = parse_expression(&mut cursor, &DecoderConfig::default()).unwrap();
        assert!(node.is_invalid());
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn summary_leaves_out_children() {
        let leaf = ExpressionNode::variable(0x08, 0);
        let mut node = leaf.clone();
        for _ in 0..50 {
            node = ExpressionNode::operator(Operator::UnaryMinus, 0x08, vec![node]).unwrap();
        }
        assert_eq!(summary(&node), "operator `unary_minus` with 1 arguments");
        assert_eq!(summary(&leaf), "variable at offset 0");
        assert_eq!(
            summary(&ExpressionNode::constant64(0x0b, 0, -3)),
            "64-bit constant -3"
        );
    }
}
