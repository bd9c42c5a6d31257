//! `CHOICE` resolution: the alternative actually present is identified by
//! its tag alone, since a `CHOICE` value carries no wrapping TLV of its own.

use crate::{ErrorKind, Reader, Result, Schema, Tag, Value};

pub(super) fn decode_choice<'r>(schema: &Schema, reader: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    let mut probe = reader.fork();
    let tag = Tag::decode(&mut probe)?;

    let (name, alternative) = schema
        .alternative_for(tag.class, tag.number)
        .ok_or_else(|| reader.error(ErrorKind::NoChoiceAlternative))?;

    let value = super::decode(alternative, reader, depth + 1)?;
    Ok(Value::Choice(name, Box::new(value)))
}
