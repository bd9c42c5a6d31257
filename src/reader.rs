//! Bounds-checked byte cursor over a DER substrate.

use crate::{Error, ErrorKind, Header, Length, Result};

/// A bounds-checked sequential reader over an immutable byte slice.
///
/// Only the cursor position advances; the underlying bytes are never
/// mutated or copied until a caller asks for a slice.
pub trait Reader<'r>: Sized {
    /// Total length of the input this reader was constructed over.
    fn input_len(&self) -> Length;

    /// Current position within the input.
    fn position(&self) -> Length;

    /// Bytes not yet consumed.
    fn remaining_len(&self) -> Length {
        self.input_len().saturating_sub(self.position())
    }

    /// Have all input bytes been consumed?
    fn is_finished(&self) -> bool {
        self.remaining_len().is_zero()
    }

    /// Peek at the next byte without advancing the cursor.
    fn peek_byte(&self) -> Option<u8>;

    /// An independent reader over the same input, positioned identically to
    /// `self`, used for non-consuming lookahead (tag/header peeking).
    fn fork(&self) -> Self;

    /// Peek forward and decode a [`Header`] at the current position,
    /// without advancing the cursor.
    fn peek_header(&self) -> Result<Header> {
        Header::decode(&mut self.fork())
    }

    /// Read `len` bytes, returning a borrowed slice and advancing the
    /// cursor past them.
    fn read_slice(&mut self, len: Length) -> Result<&'r [u8]>;

    /// Read a single byte, advancing the cursor.
    fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_slice(Length::new(1))?[0])
    }

    /// Carve an independent reader over the next `len` bytes, advancing
    /// this reader's cursor past them. The returned reader's own cursor
    /// starts at zero and is entirely separate from the parent's.
    fn sub_reader(&mut self, len: Length) -> Result<SliceReader<'r>> {
        Ok(SliceReader::new(self.read_slice(len)?))
    }

    /// Read the bytes of one complete TLV production (header plus content)
    /// as an opaque slice, without interpreting it.
    fn tlv_bytes(&mut self) -> Result<&'r [u8]> {
        let mut probe = self.fork();
        let header = Header::decode(&mut probe)?;
        let header_len = probe.position().saturating_sub(self.position());
        let total_len = header_len.checked_add(header.length)?;
        self.read_slice(total_len)
    }

    /// Build an [`Error`] tagged with this reader's current position.
    fn error(&self, kind: ErrorKind) -> Error {
        kind.at(self.position())
    }

    /// Require that every byte of this reader has been consumed.
    fn finish(&self, kind: ErrorKind) -> Result<()> {
        if self.is_finished() {
            Ok(())
        } else {
            Err(self.error(kind))
        }
    }
}

/// A [`Reader`] directly over a borrowed byte slice.
#[derive(Clone, Copy, Debug)]
pub struct SliceReader<'r> {
    input: &'r [u8],
    position: usize,
}

impl<'r> SliceReader<'r> {
    /// Construct a reader over the given bytes, positioned at the start.
    pub fn new(input: &'r [u8]) -> Self {
        Self { input, position: 0 }
    }
}

impl<'r> Reader<'r> for SliceReader<'r> {
    fn input_len(&self) -> Length {
        Length::new(self.input.len() as u32)
    }

    fn position(&self) -> Length {
        Length::new(self.position as u32)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn fork(&self) -> Self {
        *self
    }

    fn read_slice(&mut self, len: Length) -> Result<&'r [u8]> {
        let len = len.to_usize();
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.error(ErrorKind::InsufficientData))?;

        let slice = &self.input[self.position..end];
        self.position = end;
        Ok(slice)
    }
}
