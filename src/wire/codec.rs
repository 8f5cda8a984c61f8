// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    error::{DecodeError, EncodeError},
    types::{Address, Bytes, ADDRESS_LENGTH, U128, WORD_LENGTH},
};
use byteorder::{BigEndian, ByteOrder};

pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn address(&mut self, address: &Address) {
        self.buffer.extend_from_slice(address.as_bytes());
    }

    pub fn word(&mut self, word: &U128) {
        let mut raw = [0u8; WORD_LENGTH];
        word.to_big_endian(&mut raw);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn u32(&mut self, value: u32) {
        let mut raw = [0u8; 4];
        BigEndian::write_u32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn i32(&mut self, value: i32) {
        let mut raw = [0u8; 4];
        BigEndian::write_i32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn u64(&mut self, value: u64) {
        let mut raw = [0u8; 8];
        BigEndian::write_u64(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    /// Length-prefixed byte string.
    pub fn bytes(
        &mut self, bytes: &[u8], field: &'static str,
    ) -> Result<(), EncodeError> {
        self.u32(length_prefix(bytes.len(), field)?);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    pub fn into_inner(self) -> Vec<u8> { self.buffer }
}

pub fn length_prefix(
    len: usize, field: &'static str,
) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLong { field, len })
}

/// Cursor over a wire buffer. Every read names the field it decodes so a
/// malformed buffer reports where it went wrong.
pub struct Reader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self { Reader { buffer, offset: 0 } }

    #[inline]
    pub fn remaining(&self) -> usize { self.buffer.len() - self.offset }

    fn take(
        &mut self, len: usize, field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                field,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn address(
        &mut self, field: &'static str,
    ) -> Result<Address, DecodeError> {
        Ok(Address::from_slice(self.take(ADDRESS_LENGTH, field)?))
    }

    pub fn word(&mut self, field: &'static str) -> Result<U128, DecodeError> {
        Ok(U128::from_big_endian(self.take(WORD_LENGTH, field)?))
    }

    pub fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(BigEndian::read_u32(self.take(4, field)?))
    }

    pub fn i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        Ok(BigEndian::read_i32(self.take(4, field)?))
    }

    pub fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        Ok(BigEndian::read_u64(self.take(8, field)?))
    }

    /// Length-prefixed byte string. The declared length must fit in what is
    /// left of the buffer.
    pub fn bytes(&mut self, field: &'static str) -> Result<Bytes, DecodeError> {
        let declared = self.u32(field)? as usize;
        if declared > self.remaining() {
            return Err(DecodeError::LengthMismatch {
                field,
                declared,
                available: self.remaining(),
            });
        }
        Ok(self.take(declared, field)?.to_vec())
    }

    /// Fails unless the whole buffer has been consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}
