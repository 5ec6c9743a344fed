//! Offset-table resolution.
//!
//! Format strings share expressions by index: an offset table of signed 16-bit entries maps a
//! slot to a byte offset inside a common expression buffer. A negative entry is the format's
//! explicit "no expression here" marker and resolves to [`ExpressionNode::ABSENT`], never to
//! an error.
use std::ops::Range;

use log::trace;

use crate::{
    config::DecoderConfig,
    error::{ExprError, ExprResult},
    magic::OFFSET_TABLE_SLOT_SIZE,
    node::ExpressionNode,
    parser::parse_expression,
    source::{ByteCursor, ByteSource},
};

/// Where a set of shared expressions lives.
///
/// `None` bases mean the format string carries no expression table at all.
pub trait ExpressionTable {
    type Source: ByteSource + ?Sized;

    /// Absolute location of the first offset-table slot.
    fn offset_table_base(&self) -> Option<u64>;

    /// Absolute location the slot offsets are relative to.
    fn expr_buffer_base(&self) -> Option<u64>;

    fn source(&self) -> &Self::Source;
}

/// Plain [`ExpressionTable`] over a borrowed byte source.
pub struct ExprTable<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    offset_table_base: Option<u64>,
    expr_buffer_base: Option<u64>,
}

impl<'a, S: ByteSource + ?Sized> ExprTable<'a, S> {
    pub fn new(
        source: &'a S,
        offset_table_base: Option<u64>,
        expr_buffer_base: Option<u64>,
    ) -> Self {
        Self {
            source,
            offset_table_base,
            expr_buffer_base,
        }
    }

    /// Like [`ExprTable::new`], with address `0` standing for "not present".
    pub fn from_raw(source: &'a S, offset_table_base: u64, expr_buffer_base: u64) -> Self {
        Self::new(
            source,
            Some(offset_table_base).filter(|&a| a != 0),
            Some(expr_buffer_base).filter(|&a| a != 0),
        )
    }
}

impl<S: ByteSource + ?Sized> ExpressionTable for ExprTable<'_, S> {
    type Source = S;

    fn offset_table_base(&self) -> Option<u64> {
        self.offset_table_base
    }

    fn expr_buffer_base(&self) -> Option<u64> {
        self.expr_buffer_base
    }

    fn source(&self) -> &S {
        self.source
    }
}

fn offset_address(base: u64, offset: i64) -> ExprResult<u64> {
    base.checked_add_signed(offset)
        .ok_or(ExprError::AddressOverflow { base, offset })
}

/// Raw offset stored in slot `index`, or `None` for an empty slot, a negative index or a
/// missing table.
pub fn slot_offset<T: ExpressionTable + ?Sized>(table: &T, index: i64) -> ExprResult<Option<u16>> {
    let Some(table_base) = table.offset_table_base() else {
        return Ok(None);
    };
    if index < 0 {
        return Ok(None);
    }

    let slot = index
        .checked_mul(OFFSET_TABLE_SLOT_SIZE as i64)
        .ok_or(ExprError::AddressOverflow {
            base: table_base,
            offset: index,
        })?;
    let mut cursor = ByteCursor::new(table.source(), offset_address(table_base, slot)?);
    let offset = cursor.read_i16()?;

    Ok(u16::try_from(offset).ok())
}

/// Decode the expression referenced by slot `index` of `table`.
///
/// Returns [`ExpressionNode::ABSENT`] without touching the expression buffer when either base
/// is unset, `index` is negative, or the slot holds a negative offset.
pub fn resolve_expression<T: ExpressionTable + ?Sized>(
    table: &T,
    index: i64,
    config: &DecoderConfig,
) -> ExprResult<ExpressionNode> {
    let Some(buffer_base) = table.expr_buffer_base() else {
        return Ok(ExpressionNode::ABSENT);
    };
    let Some(offset) = slot_offset(table, index)? else {
        trace!("Expression slot {index} is empty");
        return Ok(ExpressionNode::ABSENT);
    };

    let address = offset_address(buffer_base, offset as i64)?;
    trace!("Expression slot {index} -> offset {offset:#x} (address {address:#x})");

    let mut cursor = ByteCursor::new(table.source(), address);
    parse_expression(&mut cursor, config)
}

/// Decode every slot in `indices`, stopping at the first structural failure.
pub fn resolve_range<T: ExpressionTable + ?Sized>(
    table: &T,
    indices: Range<i64>,
    config: &DecoderConfig,
) -> ExprResult<Vec<ExpressionNode>> {
    indices
        .map(|index| resolve_expression(table, index, config))
        .collect()
}
