//! A strict DER (Distinguished Encoding Rules) decoder for ASN.1-encoded
//! data, driven by a caller-supplied [`Schema`].
//!
//! Given an octet slice and a [`Schema`] describing the expected ASN.1
//! type, [`decode_der`] either produces a populated [`Value`] or fails with
//! a [`Error`]. Unlike permissive BER decoders, every encoding that is not
//! the unique canonical DER form of the value is rejected.
//!
//! ```
//! use der_schema::{decode_der, Schema};
//!
//! let (value, rest) = decode_der(&[0x04, 0x03, b'a', b'b', b'c'], &Schema::octet_string()).unwrap();
//! assert!(rest.is_empty());
//! ```

mod decode;
mod error;
mod header;
mod length;
mod reader;
mod schema;
mod tag;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::header::Header;
pub use crate::length::Length;
pub use crate::reader::{Reader, SliceReader};
pub use crate::schema::{
    Field, NamedBit, Presence, Schema, SchemaAdapter, SchemaKind, SizeConstraint, TagOverlay, Value,
};
pub use crate::tag::{Class, Form, Tag};

/// Recursion-depth ceiling for nested EXPLICIT wrappers and constructed
/// nesting in general. Chosen at the low end of the `[4, 8]` range the
/// specification allows; bounds memory use against pathological or cyclic
/// schemas.
pub const MAX_DEPTH: u8 = 4;

/// Decode `substrate` against `schema`, returning the decoded [`Value`] and
/// any trailing bytes.
///
/// Trailing bytes are always empty on success: any remainder after the
/// outer TLV is itself a decode error (`TrailingDataAfterTLV`), not a
/// returned remainder. The second element of the returned tuple exists to
/// preserve call-signature symmetry with permissive decoders that do return
/// a remainder.
pub fn decode_der<'r>(substrate: &'r [u8], schema: &Schema) -> Result<(Value, &'r [u8])> {
    let mut reader = SliceReader::new(substrate);
    let value = decode::decode(schema, &mut reader, 0)?;
    reader.finish(ErrorKind::TrailingDataAfterTLV)?;
    Ok((value, &[]))
}
