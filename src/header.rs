//! ASN.1 DER headers: the tag + length component of a TLV.

use crate::{Length, Reader, Result, Tag};
use core::fmt;

/// Tag and length component of a TLV-encoded value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    /// Tag representing the type of the encoded value.
    pub tag: Tag,

    /// Length of the encoded value's content, not counting the header
    /// itself.
    pub length: Length,
}

impl Header {
    /// Decode a DER header (identifier octet + length octets).
    pub(crate) fn decode<'r>(reader: &mut impl Reader<'r>) -> Result<Self> {
        let tag = Tag::decode(reader)?;
        let length = Length::decode(reader)?;
        Ok(Self { tag, length })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (length {})", self.tag, self.length)
    }
}
