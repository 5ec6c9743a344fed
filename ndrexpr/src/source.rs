//! Read-only, absolute-addressed byte sources.
//!
//! The decoder never owns the memory it reads from: format strings may live in a mapped
//! image, in a snapshot of another process, or in a test buffer. [`ByteSource`] is the only
//! capability the decoder needs, and [`ByteCursor`] layers sequential little-endian reads on top.
use crate::error::{ExprError, ExprResult};

/// Random-access, read-only view over bytes addressed by absolute location.
pub trait ByteSource {
    /// Total number of addressable bytes.
    fn len(&self) -> u64;

    /// Fill `buf` with the bytes starting at `address`.
    ///
    /// Must fail with [`ExprError::OutOfBounds`] if any requested byte is unavailable, in
    /// which case the contents of `buf` are unspecified.
    fn read_at(&self, address: u64, buf: &mut [u8]) -> ExprResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_from_slice(bytes: &[u8], start: u64, address: u64, buf: &mut [u8]) -> ExprResult<()> {
    let out_of_bounds = || ExprError::OutOfBounds {
        address,
        size: buf.len(),
        len: bytes.len() as u64,
    };

    let begin = usize::try_from(start).map_err(|_| out_of_bounds())?;
    let end = begin.checked_add(buf.len()).ok_or_else(out_of_bounds)?;
    let chunk = bytes.get(begin..end).ok_or_else(out_of_bounds)?;
    buf.copy_from_slice(chunk);
    Ok(())
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_at(&self, address: u64, buf: &mut [u8]) -> ExprResult<()> {
        read_from_slice(self, address, address, buf)
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn read_at(&self, address: u64, buf: &mut [u8]) -> ExprResult<()> {
        self.as_slice().read_at(address, buf)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn read_at(&self, address: u64, buf: &mut [u8]) -> ExprResult<()> {
        (**self).read_at(address, buf)
    }
}

/// A borrowed byte slice that appears at absolute address `base`.
///
/// Useful to decode format strings out of an image mapped at its preferred base, where
/// offset tables and expression buffers are known by virtual address.
#[derive(Debug, Clone, Copy)]
pub struct BasedSlice<'a> {
    base: u64,
    bytes: &'a [u8],
}

impl<'a> BasedSlice<'a> {
    pub fn new(base: u64, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// One past the last addressable byte, saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.bytes.len() as u64)
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.base && address < self.end()
    }
}

impl ByteSource for BasedSlice<'_> {
    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_at(&self, address: u64, buf: &mut [u8]) -> ExprResult<()> {
        match address.checked_sub(self.base) {
            Some(start) => read_from_slice(self.bytes, start, address, buf),
            None => Err(ExprError::OutOfBounds {
                address,
                size: buf.len(),
                len: self.bytes.len() as u64,
            }),
        }
    }
}

/// Sequential little-endian reader over a [`ByteSource`] with absolute seeking.
///
/// A failed read leaves the position untouched.
pub struct ByteCursor<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    position: u64,
}

impl<'a, S: ByteSource + ?Sized> ByteCursor<'a, S> {
    pub fn new(source: &'a S, position: u64) -> Self {
        Self { source, position }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn seek(&mut self, address: u64) {
        self.position = address;
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    fn read_array<const N: usize>(&mut self) -> ExprResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.source.read_at(self.position, &mut buf)?;
        self.position = self
            .position
            .checked_add(N as u64)
            .ok_or(ExprError::AddressOverflow {
                base: self.position,
                offset: N as i64,
            })?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> ExprResult<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    pub fn read_i8(&mut self) -> ExprResult<i8> {
        self.read_array().map(i8::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> ExprResult<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> ExprResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> ExprResult<i64> {
        self.read_array().map(i64::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_little_endian_and_advances() {
        let data = [0x01u8, 0xfe, 0xff, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&data[..], 0);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.read_i32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn failed_read_does_not_move_cursor() {
        let data = [0u8; 3];
        let mut cursor = ByteCursor::new(&data[..], 1);
        let err = cursor.read_i32().unwrap_err();
        assert_eq!(
            err,
            ExprError::OutOfBounds {
                address: 1,
                size: 4,
                len: 3
            }
        );
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_i16().unwrap(), 0);
    }

    #[test]
    fn based_slice_maps_absolute_addresses() {
        let data = [0xaau8, 0xbb, 0xcc];
        let source = BasedSlice::new(0x4000, &data);
        let mut cursor = ByteCursor::new(&source, 0x4001);
        assert_eq!(cursor.read_u8().unwrap(), 0xbb);
        assert!(source.contains(0x4002));
        assert!(!source.contains(0x4003));
        assert!(!source.contains(0x3fff));

        cursor.seek(0x3fff);
        assert!(cursor.read_u8().unwrap_err().is_out_of_bounds());
        cursor.seek(0x4003);
        assert!(cursor.read_u8().unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn huge_addresses_are_out_of_bounds() {
        let data = vec![0u8; 4];
        let mut buf = [0u8; 2];
        assert!(data.read_at(u64::MAX, &mut buf).is_err());
        assert!(data.read_at(3, &mut buf).is_err());
        assert!(data.read_at(2, &mut buf).is_ok());
    }
}
