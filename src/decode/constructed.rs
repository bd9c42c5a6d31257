//! `SEQUENCE`, `SET`, `SEQUENCE OF`, and `SET OF` decoding.

use crate::reader::SliceReader;
use crate::{Class, ErrorKind, Presence, Reader, Result, Schema, Tag, TagOverlay, Value};

/// Peek the identifier octet at the content cursor without consuming it,
/// via a one-byte-only forked read (cheaper than a full header peek, and
/// one that never fails on a field that turns out to be absent).
fn peek_tag<'r>(content: &impl Reader<'r>) -> Result<Option<Tag>> {
    if content.is_finished() {
        return Ok(None);
    }
    let mut probe = content.fork();
    Ok(Some(Tag::decode(&mut probe)?))
}

/// Does `tag`, as peeked on the wire, belong to `schema`'s field?
fn field_tag_matches(schema: &Schema, tag: Tag) -> bool {
    match schema.overlays().first() {
        Some(TagOverlay::Implicit(number)) | Some(TagOverlay::Explicit(number)) => {
            tag.class == Class::ContextSpecific && tag.number == *number
        }
        None => match schema.kind() {
            crate::SchemaKind::Choice => schema.alternative_for(tag.class, tag.number).is_some(),
            crate::SchemaKind::Any => true,
            _ => schema.base_tag().map_or(false, |base| base.class == tag.class && base.number == tag.number),
        },
    }
}

/// Canonical ordering key for a tag, per X.690's SET sort (by class, then
/// tag number).
fn tag_order(tag: Tag) -> (u8, u8) {
    let class = match tag.class {
        Class::Universal => 0,
        Class::Application => 1,
        Class::ContextSpecific => 2,
        Class::Private => 3,
    };
    (class, tag.number)
}

pub(super) fn sequence<'r>(schema: &Schema, content: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    let mut result = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let next = peek_tag(content)?;
        let present = next.map_or(false, |tag| field_tag_matches(&field.schema, tag));

        if present {
            let value = super::decode(&field.schema, content, depth + 1)?;
            if let Presence::Default(default) = &field.presence {
                if &value == default {
                    return Err(content.error(ErrorKind::DefaultValueEncoded));
                }
            }
            result.push((field.name, Some(value)));
        } else {
            match &field.presence {
                Presence::Required => return Err(content.error(ErrorKind::MissingRequiredField)),
                Presence::Optional | Presence::Default(_) => result.push((field.name, None)),
            }
        }
    }

    content.finish(ErrorKind::UnexpectedTrailingField)?;
    Ok(Value::Structure(result))
}

pub(super) fn set<'r>(schema: &Schema, content: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    let mut matched = vec![false; schema.fields().len()];
    let mut result: Vec<(&'static str, Option<Value>)> =
        schema.fields().iter().map(|field| (field.name, None)).collect();
    let mut previous: Option<Tag> = None;

    while let Some(tag) = peek_tag(content)? {
        if previous.map_or(false, |prev| tag_order(tag) < tag_order(prev)) {
            return Err(content.error(ErrorKind::SetMembersMisordered));
        }
        previous = Some(tag);

        let index = schema
            .fields()
            .iter()
            .enumerate()
            .position(|(i, field)| !matched[i] && field_tag_matches(&field.schema, tag))
            .ok_or_else(|| content.error(ErrorKind::UnexpectedTrailingField))?;

        matched[index] = true;
        let field = &schema.fields()[index];
        let value = super::decode(&field.schema, content, depth + 1)?;
        if let Presence::Default(default) = &field.presence {
            if value == *default {
                return Err(content.error(ErrorKind::DefaultValueEncoded));
            }
        }
        result[index] = (field.name, Some(value));
    }

    for (index, field) in schema.fields().iter().enumerate() {
        if !matched[index] && matches!(field.presence, Presence::Required) {
            return Err(content.error(ErrorKind::MissingRequiredField));
        }
    }

    Ok(Value::Structure(result))
}

pub(super) fn sequence_of<'r>(schema: &Schema, content: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    let component = schema.component().expect("SEQUENCE OF schema always carries a component");

    let mut items = Vec::new();
    while !content.is_finished() {
        items.push(super::decode(component, content, depth + 1)?);
    }

    if let Some(constraint) = schema.size_constraint() {
        if !constraint.allows(items.len()) {
            return Err(content.error(ErrorKind::SizeConstraintViolated));
        }
    }

    Ok(Value::List(items))
}

pub(super) fn set_of<'r>(schema: &Schema, content: &mut impl Reader<'r>, depth: u8) -> Result<Value> {
    let component = schema.component().expect("SET OF schema always carries a component");

    let mut items = Vec::new();
    let mut members: Vec<&[u8]> = Vec::new();

    while !content.is_finished() {
        let raw = content.tlv_bytes()?;
        let mut element = SliceReader::new(raw);
        items.push(super::decode(component, &mut element, depth + 1)?);
        element.finish(ErrorKind::TrailingContentBytes)?;
        members.push(raw);
    }

    if members.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(content.error(ErrorKind::SetOfMembersMisordered));
    }

    if let Some(constraint) = schema.size_constraint() {
        if !constraint.allows(items.len()) {
            return Err(content.error(ErrorKind::SizeConstraintViolated));
        }
    }

    Ok(Value::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, SizeConstraint};

    #[test]
    fn sequence_optional_field_absent() {
        let schema = Schema::sequence(vec![
            Field::required("a", Schema::boolean()),
            Field::optional("b", Schema::integer()),
        ]);
        let mut content = SliceReader::new(&[0x01, 0x01, 0xFF]);
        let value = sequence(&schema, &mut content, 0).unwrap();
        assert_eq!(
            value,
            Value::Structure(vec![("a", Some(Value::Boolean(true))), ("b", None)])
        );
    }

    #[test]
    fn sequence_missing_required_field() {
        let schema = Schema::sequence(vec![Field::required("a", Schema::boolean())]);
        let mut content = SliceReader::new(&[]);
        assert_eq!(
            sequence(&schema, &mut content, 0).unwrap_err().kind(),
            ErrorKind::MissingRequiredField
        );
    }

    #[test]
    fn sequence_default_value_encoded_rejected() {
        let schema = Schema::sequence(vec![Field::with_default(
            "a",
            Schema::boolean(),
            Value::Boolean(false),
        )]);
        let mut content = SliceReader::new(&[0x01, 0x01, 0x00]);
        assert_eq!(
            sequence(&schema, &mut content, 0).unwrap_err().kind(),
            ErrorKind::DefaultValueEncoded
        );
    }

    #[test]
    fn sequence_trailing_field_rejected() {
        let schema = Schema::sequence(vec![Field::required("a", Schema::boolean())]);
        let mut content = SliceReader::new(&[0x01, 0x01, 0xFF, 0x01, 0x01, 0xFF]);
        assert_eq!(
            sequence(&schema, &mut content, 0).unwrap_err().kind(),
            ErrorKind::UnexpectedTrailingField
        );
    }

    #[test]
    fn set_accepts_fields_out_of_schema_order() {
        let schema = Schema::set(vec![
            Field::required("b", Schema::implicit(1, Schema::boolean())),
            Field::required("a", Schema::implicit(0, Schema::boolean())),
        ]);
        // Wire order is tag-ascending: [0] before [1], opposite of schema order.
        let mut content = SliceReader::new(&[0x80, 0x01, 0xFF, 0x81, 0x01, 0x00]);
        let value = set(&schema, &mut content, 0).unwrap();
        assert_eq!(
            value,
            Value::Structure(vec![
                ("b", Some(Value::Boolean(false))),
                ("a", Some(Value::Boolean(true))),
            ])
        );
    }

    #[test]
    fn set_misordered_members_rejected() {
        let schema = Schema::set(vec![
            Field::required("a", Schema::implicit(0, Schema::boolean())),
            Field::required("b", Schema::implicit(1, Schema::boolean())),
        ]);
        let mut content = SliceReader::new(&[0x81, 0x01, 0xFF, 0x80, 0x01, 0x00]);
        assert_eq!(
            set(&schema, &mut content, 0).unwrap_err().kind(),
            ErrorKind::SetMembersMisordered
        );
    }

    #[test]
    fn sequence_of_booleans() {
        let schema = Schema::sequence_of(Schema::boolean());
        let mut content = SliceReader::new(&[0x01, 0x01, 0xFF, 0x01, 0x01, 0x00]);
        let value = sequence_of(&schema, &mut content, 0).unwrap();
        assert_eq!(value, Value::List(vec![Value::Boolean(true), Value::Boolean(false)]));
    }

    #[test]
    fn sequence_of_size_constraint_violated() {
        let schema = Schema::sequence_of_sized(Schema::boolean(), SizeConstraint::at_least(2));
        let mut content = SliceReader::new(&[0x01, 0x01, 0xFF]);
        assert_eq!(
            sequence_of(&schema, &mut content, 0).unwrap_err().kind(),
            ErrorKind::SizeConstraintViolated
        );
    }

    #[test]
    fn set_of_requires_byte_lexical_order() {
        let schema = Schema::set_of(Schema::integer());
        // INTEGER 2 (0x02 0x01 0x02) sorts after INTEGER 1 (0x02 0x01 0x01).
        let mut content = SliceReader::new(&[0x02, 0x01, 0x02, 0x02, 0x01, 0x01]);
        assert_eq!(
            set_of(&schema, &mut content, 0).unwrap_err().kind(),
            ErrorKind::SetOfMembersMisordered
        );
    }

    #[test]
    fn set_of_accepts_ascending_order() {
        let schema = Schema::set_of(Schema::integer());
        let mut content = SliceReader::new(&[0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
        let value = set_of(&schema, &mut content, 0).unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::Integer(vec![1]), Value::Integer(vec![2])])
        );
    }
}
