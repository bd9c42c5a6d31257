//! Per-universal-type validators enforcing DER's canonical-form rules.
//!
//! Each validator consumes its content reader entirely; the dispatch core
//! checks afterward that nothing was left over.

use crate::{ErrorKind, Reader, Result, Schema, SchemaKind, Value};

pub(super) fn boolean<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    let byte = content.read_byte()?;
    match byte {
        0x00 => Ok(Value::Boolean(false)),
        0xFF => Ok(Value::Boolean(true)),
        _ => Err(content.error(ErrorKind::BooleanNonCanonical)),
    }
}

pub(super) fn integer<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    let bytes = content.read_slice(content.remaining_len())?;
    if bytes.is_empty() {
        return Err(content.error(ErrorKind::InsufficientData));
    }
    if bytes.len() >= 2 {
        let redundant_positive = bytes[0] == 0x00 && bytes[1] & 0x80 == 0;
        let redundant_negative = bytes[0] == 0xFF && bytes[1] & 0x80 != 0;
        if redundant_positive || redundant_negative {
            return Err(content.error(ErrorKind::IntegerNonMinimal));
        }
    }
    Ok(Value::Integer(bytes.to_vec()))
}

pub(super) fn null<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    if !content.is_finished() {
        return Err(content.error(ErrorKind::NullNonEmpty));
    }
    Ok(Value::Null)
}

pub(super) fn object_identifier<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    if content.is_finished() {
        return Err(content.error(ErrorKind::InsufficientData));
    }

    let mut arcs = Vec::new();
    while !content.is_finished() {
        let start = content.position();
        let mut value: u64 = 0;
        let mut first = true;
        loop {
            let byte = content.read_byte()?;
            if first && byte == 0x80 {
                return Err(ErrorKind::ObjectIdentifierNonMinimal.at(start));
            }
            first = false;
            value = (value << 7) | (byte & 0x7F) as u64;
            if byte & 0x80 == 0 {
                break;
            }
        }
        arcs.push(value);
    }

    let mut result = Vec::with_capacity(arcs.len() + 1);
    let first_sub = arcs[0];
    if first_sub < 80 {
        result.push(first_sub / 40);
        result.push(first_sub % 40);
    } else {
        result.push(2);
        result.push(first_sub - 80);
    }
    result.extend_from_slice(&arcs[1..]);

    Ok(Value::ObjectIdentifier(result))
}

pub(super) fn bit_string<'r>(schema: &Schema, content: &mut impl Reader<'r>) -> Result<Value> {
    if content.is_finished() {
        return Err(content.error(ErrorKind::InsufficientData));
    }
    let unused_bits = content.read_byte()?;
    if unused_bits > 7 {
        return Err(content.error(ErrorKind::BitStringPadBitsNonZero));
    }

    let bytes = content.read_slice(content.remaining_len())?;
    if unused_bits > 0 {
        if bytes.is_empty() {
            return Err(content.error(ErrorKind::BitStringPadBitsNonZero));
        }
        let last = *bytes.last().unwrap();
        let mask = (1u8 << unused_bits) - 1;
        if last & mask != 0 {
            return Err(content.error(ErrorKind::BitStringPadBitsNonZero));
        }
    }

    if !schema.named_bits().is_empty() {
        check_named_bits_minimal(bytes, unused_bits, content)?;
    }

    Ok(Value::BitString { unused_bits, bytes: bytes.to_vec() })
}

/// DER requires a named `BIT STRING` to omit all trailing zero bits beyond
/// the last named bit set to one: a trailing all-zero value octet is
/// rejected, and so is a last octet whose lowest set bit sits above
/// `unused_bits` — that gap is itself a run of trailing zero value bits that
/// canonical encoding would have trimmed (by raising `unused_bits` or
/// dropping the octet).
fn check_named_bits_minimal<'r>(bytes: &[u8], unused_bits: u8, content: &impl Reader<'r>) -> Result<()> {
    let Some(&last) = bytes.last() else { return Ok(()) };
    if last == 0 || last.trailing_zeros() != unused_bits as u32 {
        return Err(content.error(ErrorKind::NamedBitStringNonMinimal));
    }
    Ok(())
}

pub(super) fn octet_string<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    let bytes = content.read_slice(content.remaining_len())?;
    Ok(Value::OctetString(bytes.to_vec()))
}

pub(super) fn character_string<'r>(kind: SchemaKind, content: &mut impl Reader<'r>) -> Result<Value> {
    let bytes = content.read_slice(content.remaining_len())?;

    match kind {
        SchemaKind::Utf8String => {
            let s = core::str::from_utf8(bytes).map_err(|_| content.error(ErrorKind::IllegalCharacter))?;
            Ok(Value::CharacterString(s.to_owned()))
        }
        SchemaKind::PrintableString => {
            for &b in bytes {
                if !is_printable_string_char(b) {
                    return Err(content.error(ErrorKind::IllegalCharacter));
                }
            }
            Ok(Value::CharacterString(String::from_utf8_lossy(bytes).into_owned()))
        }
        SchemaKind::Ia5String | SchemaKind::VisibleString => {
            for &b in bytes {
                if b > 0x7F {
                    return Err(content.error(ErrorKind::IllegalCharacter));
                }
            }
            Ok(Value::CharacterString(String::from_utf8_lossy(bytes).into_owned()))
        }
        SchemaKind::NumericString => {
            for &b in bytes {
                if !(b.is_ascii_digit() || b == b' ') {
                    return Err(content.error(ErrorKind::IllegalCharacter));
                }
            }
            Ok(Value::CharacterString(String::from_utf8_lossy(bytes).into_owned()))
        }
        SchemaKind::UniversalString => {
            if bytes.len() % 4 != 0 {
                return Err(content.error(ErrorKind::IllegalCharacter));
            }
            Ok(Value::OctetBackedString(bytes.to_vec()))
        }
        SchemaKind::BmpString => {
            if bytes.len() % 2 != 0 {
                return Err(content.error(ErrorKind::IllegalCharacter));
            }
            Ok(Value::OctetBackedString(bytes.to_vec()))
        }
        SchemaKind::TeletexString | SchemaKind::GeneralString | SchemaKind::GraphicString => {
            Ok(Value::OctetBackedString(bytes.to_vec()))
        }
        _ => unreachable!("non-string kind routed to character_string"),
    }
}

fn is_printable_string_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?')
}

pub(super) fn utc_time<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    let bytes = content.read_slice(content.remaining_len())?;
    let s = core::str::from_utf8(bytes).map_err(|_| content.error(ErrorKind::IllegalCharacter))?;
    // YYMMDDhhmmssZ
    let digits_ok = s.len() == 13 && s.ends_with('Z') && s[..12].bytes().all(|b| b.is_ascii_digit());
    if !digits_ok {
        return Err(content.error(ErrorKind::IllegalCharacter));
    }
    Ok(Value::Time(s.to_owned()))
}

pub(super) fn generalized_time<'r>(content: &mut impl Reader<'r>) -> Result<Value> {
    let bytes = content.read_slice(content.remaining_len())?;
    let s = core::str::from_utf8(bytes).map_err(|_| content.error(ErrorKind::IllegalCharacter))?;

    if !s.ends_with('Z') {
        return Err(content.error(ErrorKind::IllegalCharacter));
    }
    let body = &s[..s.len() - 1];
    let (whole, fraction) = match body.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (body, None),
    };

    if whole.len() != 14 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(content.error(ErrorKind::IllegalCharacter));
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) || fraction.ends_with('0') {
            return Err(content.error(ErrorKind::IllegalCharacter));
        }
    }

    Ok(Value::Time(s.to_owned()))
}
