//! The dispatch core: the top-level recursive entry point that selects a
//! decode path (primitive / constructed / choice / tagged) for a schema
//! node and enforces the outer tag, length, and recursion-depth invariants.

mod choice;
mod constructed;
mod primitives;

use crate::{ErrorKind, Form, Header, Reader, Result, Schema, SchemaKind, Tag, TagOverlay, Value, MAX_DEPTH};

/// Decode one schema node from `reader` at the given recursion `depth`.
///
/// This is the function every recursive descent step (SEQUENCE fields,
/// SEQUENCE OF / SET OF elements, CHOICE alternatives, EXPLICIT wrapper
/// contents) calls back into, always with `depth + 1`.
pub(crate) fn decode<'r>(schema: &Schema, reader: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(reader.error(ErrorKind::RecursionLimitExceeded));
    }

    if let Some(&overlay) = schema.overlays().first() {
        return decode_overlay(schema, overlay, reader, depth);
    }

    if schema.kind() == SchemaKind::Choice {
        return choice::decode_choice(schema, reader, depth);
    }

    if schema.kind() == SchemaKind::Any {
        return decode_any(reader);
    }

    let header = Header::decode(reader)?;
    let expected = schema
        .base_tag()
        .expect("non-CHOICE, non-ANY schema always has a base universal tag");
    check_tag(expected, header.tag, reader)?;

    let mut content = reader.sub_reader(header.length)?;
    let value = dispatch_kind(schema, &mut content, depth)?;
    content.finish(ErrorKind::TrailingContentBytes)?;
    Ok(value)
}

/// Compare an identifier's `(class, number)` against the schema's expected
/// tag, then its form — primitive universal types must use primitive form
/// in DER.
fn check_tag<'r>(expected: Tag, actual: Tag, reader: &impl Reader<'r>) -> Result<()> {
    if expected.class != actual.class || expected.number != actual.number {
        return Err(reader.error(ErrorKind::TagMismatch { expected, actual }));
    }
    if expected.form == Form::Primitive && actual.form == Form::Constructed {
        return Err(reader.error(ErrorKind::ConstructedFormForbidden));
    }
    Ok(())
}

/// Strip the outermost tag overlay and decode the rest of the node against
/// it: an EXPLICIT overlay wraps a complete inner TLV; an IMPLICIT overlay
/// only replaces the tag seen on the wire.
fn decode_overlay<'r>(
    schema: &Schema,
    overlay: TagOverlay,
    reader: &mut impl Reader<'r>,
    depth: u8,
) -> Result<Value> {
    match overlay {
        TagOverlay::Explicit(number) => {
            let remaining = schema.without_outermost_overlay();
            let header = Header::decode(reader)?;
            let expected = Tag::context_specific(number, Form::Constructed);
            check_tag(expected, header.tag, reader)?;

            let mut content = reader.sub_reader(header.length)?;
            let value = decode(&remaining, &mut content, depth + 1)?;
            content.finish(ErrorKind::TrailingContentBytes)?;
            Ok(value)
        }
        TagOverlay::Implicit(number) => {
            // IMPLICIT only replaces the tag slot on the wire; if several
            // IMPLICIT overlays are stacked they all share that one slot
            // (X.690 discards all but the outermost), so collapse them
            // before deciding how to read the content.
            let mut remaining = schema.without_outermost_overlay();
            while let Some(&TagOverlay::Implicit(_)) = remaining.overlays().first() {
                remaining = remaining.without_outermost_overlay();
            }

            // X.680 forbids IMPLICIT-tagging a CHOICE: it has no tag of its
            // own for IMPLICIT to replace, so there is no alternative left
            // to resolve once the wire tag is gone.
            if remaining.overlays().is_empty() && remaining.kind() == SchemaKind::Choice {
                return Err(reader.error(ErrorKind::NoChoiceAlternative));
            }

            let form = remaining.base_tag().map(|tag| tag.form).unwrap_or(Form::Constructed);
            let header = Header::decode(reader)?;
            let expected = Tag::context_specific(number, form);
            check_tag(expected, header.tag, reader)?;

            let mut content = reader.sub_reader(header.length)?;
            let value = if matches!(remaining.overlays().first(), Some(TagOverlay::Explicit(_))) {
                // An EXPLICIT overlay still underneath keeps its own
                // wrapping semantics: content holds exactly one inner TLV.
                decode(&remaining, &mut content, depth + 1)?
            } else {
                dispatch_kind(&remaining, &mut content, depth + 1)?
            };
            content.finish(ErrorKind::TrailingContentBytes)?;
            Ok(value)
        }
    }
}

/// Preserve the raw, complete TLV bytes of an `ANY` schema node without
/// interpreting them — whatever tag arrives is accepted.
fn decode_any<'r>(reader: &mut impl Reader<'r>) -> Result<Value> {
    Ok(Value::Any(reader.tlv_bytes()?.to_vec()))
}

/// Dispatch into the per-kind validator for a schema node whose outer tag
/// has already been checked, given its content reader.
fn dispatch_kind<'r>(schema: &Schema, content: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    use SchemaKind::*;
    match schema.kind() {
        Boolean => primitives::boolean(content),
        Integer | Enumerated => primitives::integer(content),
        Null => primitives::null(content),
        ObjectIdentifier => primitives::object_identifier(content),
        BitString => primitives::bit_string(schema, content),
        OctetString => primitives::octet_string(content),
        Utf8String | PrintableString | Ia5String | NumericString | VisibleString | TeletexString
        | UniversalString | BmpString | GeneralString | GraphicString => {
            primitives::character_string(schema.kind(), content)
        }
        UtcTime => primitives::utc_time(content),
        GeneralizedTime => primitives::generalized_time(content),
        Sequence => constructed::sequence(schema, content, depth),
        Set => constructed::set(schema, content, depth),
        SequenceOf => constructed::sequence_of(schema, content, depth),
        SetOf => constructed::set_of(schema, content, depth),
        // X.680 forbids IMPLICIT-tagging a CHOICE (it has no tag of its
        // own to replace); `decode` never reaches here for a bare CHOICE.
        Choice => unreachable!("CHOICE is resolved before dispatch_kind"),
        // An IMPLICIT-tagged ANY is unusual (ANY already accepts any tag)
        // but mechanically well-defined: the tag slot was already consumed
        // by the overlay, so just take the remaining content verbatim.
        Any => Ok(Value::Any(content.read_slice(content.remaining_len())?.to_vec())),
    }
}
