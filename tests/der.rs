//! Concrete hex-input scenarios exercising the decode core end to end.

use der_schema::{decode_der, ErrorKind, Field, Schema, SizeConstraint, Value};
use hex_literal::hex;

fn err(bytes: &[u8], schema: &Schema) -> ErrorKind {
    decode_der(bytes, schema).unwrap_err().kind()
}

#[test]
fn octet_string_decodes_with_no_remainder() {
    let (value, rest) = decode_der(&hex!("04036162 63"), &Schema::octet_string()).unwrap();
    assert_eq!(value, Value::OctetString(b"abc".to_vec()));
    assert!(rest.is_empty());
}

#[test]
fn octet_string_trailing_data_after_tlv_rejected() {
    assert_eq!(
        err(&hex!("040161 6263"), &Schema::octet_string()),
        ErrorKind::TrailingDataAfterTLV
    );
}

#[test]
fn long_form_tag_unsupported() {
    assert_eq!(
        err(&hex!("1F0101"), &Schema::octet_string()),
        ErrorKind::LongFormTagUnsupported
    );
}

#[test]
fn tag_mismatch_on_wrong_universal_type() {
    match err(&hex!("040101"), &Schema::bit_string()) {
        ErrorKind::TagMismatch { .. } => {}
        other => panic!("expected TagMismatch, got {other:?}"),
    }
}

#[test]
fn boolean_true() {
    let (value, _) = decode_der(&hex!("0101FF"), &Schema::boolean()).unwrap();
    assert_eq!(value, Value::Boolean(true));
}

#[test]
fn boolean_non_canonical_rejected() {
    assert_eq!(err(&hex!("010101"), &Schema::boolean()), ErrorKind::BooleanNonCanonical);
}

#[test]
fn integer_non_minimal_rejected() {
    assert_eq!(err(&hex!("0202007F"), &Schema::integer()), ErrorKind::IntegerNonMinimal);
}

#[test]
fn bit_string_excess_unused_bits_rejected() {
    assert_eq!(
        err(&hex!("03020800"), &Schema::bit_string()),
        ErrorKind::BitStringPadBitsNonZero
    );
}

#[test]
fn null_decodes_empty() {
    let (value, _) = decode_der(&hex!("0500"), &Schema::null()).unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn set_of_out_of_order_rejected() {
    let schema = Schema::set_of(Schema::printable_string());
    assert_eq!(
        err(&hex!("31061301421301 41"), &schema),
        ErrorKind::SetOfMembersMisordered
    );
}

#[test]
fn sequence_of_below_minimum_size_rejected() {
    let schema = Schema::sequence_of_sized(Schema::boolean(), SizeConstraint::at_least(1));
    assert_eq!(err(&hex!("3000"), &schema), ErrorKind::SizeConstraintViolated);
}

#[test]
fn sequence_default_value_encoded_rejected() {
    let schema = Schema::sequence(vec![
        Field::required("a", Schema::printable_string()),
        Field::required("b", Schema::utf8_string()),
        Field::with_default(
            "stamp",
            Schema::utc_time(),
            Value::Time("251231235959Z".to_owned()),
        ),
        Field::required("c", Schema::printable_string()),
    ]);
    let input = hex!(
        "3018"
        "1301 41"
        "0C01 61"
        "170D 323531323331323335393539 5A"
        "1301 42"
    );
    assert_eq!(err(&input, &schema), ErrorKind::DefaultValueEncoded);
}

#[test]
fn sequence_default_omitted_succeeds() {
    let schema = Schema::sequence(vec![Field::with_default(
        "stamp",
        Schema::utc_time(),
        Value::Time("251231235959Z".to_owned()),
    )]);
    let (value, _) = decode_der(&hex!("3000"), &schema).unwrap();
    assert_eq!(value, Value::Structure(vec![("stamp", None)]));
}

#[test]
fn sequence_explicit_field_decodes() {
    let schema = Schema::sequence(vec![Field::required(
        "field",
        Schema::explicit(0, Schema::printable_string()),
    )]);
    let (value, _) = decode_der(&hex!("3007 A005 1303 414243"), &schema).unwrap();
    assert_eq!(
        value,
        Value::Structure(vec![(
            "field",
            Some(Value::CharacterString("ABC".to_owned()))
        )])
    );
}

#[test]
fn explicit_nesting_past_max_depth_rejected() {
    let mut schema = Schema::printable_string();
    for _ in 0..5 {
        schema = Schema::explicit(0, schema);
    }
    let wrapped = Schema::sequence(vec![Field::required("field", schema)]);
    let input = hex!("300D A00B A009 A007 A005 A003 1301 30");
    assert_eq!(err(&input, &wrapped), ErrorKind::RecursionLimitExceeded);
}

#[test]
fn printable_string_illegal_character_rejected() {
    assert_eq!(
        err(&hex!("13017E"), &Schema::printable_string()),
        ErrorKind::IllegalCharacter
    );
}

#[test]
fn choice_resolves_by_tag() {
    let schema = Schema::choice(vec![
        ("number", der_schema::Tag::universal(der_schema::Tag::INTEGER), Schema::integer()),
        ("flag", der_schema::Tag::universal(der_schema::Tag::BOOLEAN), Schema::boolean()),
    ]);
    let (value, _) = decode_der(&hex!("0101FF"), &schema).unwrap();
    assert_eq!(value, Value::Choice("flag", Box::new(Value::Boolean(true))));
}

#[test]
fn choice_no_matching_alternative_rejected() {
    let schema = Schema::choice(vec![(
        "flag",
        der_schema::Tag::universal(der_schema::Tag::BOOLEAN),
        Schema::boolean(),
    )]);
    assert_eq!(err(&hex!("020101"), &schema), ErrorKind::NoChoiceAlternative);
}

#[test]
fn explicit_tagged_choice_unwraps_wrapper_before_resolving_alternative() {
    let inner = Schema::choice(vec![
        ("number", der_schema::Tag::universal(der_schema::Tag::INTEGER), Schema::integer()),
        ("flag", der_schema::Tag::universal(der_schema::Tag::BOOLEAN), Schema::boolean()),
    ]);
    let schema = Schema::explicit(0, inner);
    // A0 03 | 01 01 FF: outer EXPLICIT [0] wrapper around a BOOLEAN TLV.
    let (value, _) = decode_der(&hex!("A003 0101FF"), &schema).unwrap();
    assert_eq!(value, Value::Choice("flag", Box::new(Value::Boolean(true))));
}

#[test]
fn implicit_tagged_choice_rejected() {
    let inner = Schema::choice(vec![(
        "flag",
        der_schema::Tag::universal(der_schema::Tag::BOOLEAN),
        Schema::boolean(),
    )]);
    let schema = Schema::implicit(0, inner);
    assert_eq!(err(&hex!("800101"), &schema), ErrorKind::NoChoiceAlternative);
}

#[test]
fn set_accepts_implicit_fields_sorted_by_wire_tag_regardless_of_schema_order() {
    let schema = Schema::set(vec![
        Field::required("second", Schema::implicit(1, Schema::integer())),
        Field::required("first", Schema::implicit(0, Schema::boolean())),
    ]);
    let (value, _) = decode_der(&hex!("3106 8001FF 810102"), &schema).unwrap();
    assert_eq!(
        value,
        Value::Structure(vec![
            ("second", Some(Value::Integer(vec![2]))),
            ("first", Some(Value::Boolean(true))),
        ])
    );
}

#[test]
fn optional_field_may_be_omitted_and_decoded_independently() {
    let schema = Schema::sequence(vec![
        Field::required("a", Schema::boolean()),
        Field::optional("b", Schema::integer()),
    ]);

    let (present, _) = decode_der(&hex!("3006 0101FF 020102"), &schema).unwrap();
    assert_eq!(
        present,
        Value::Structure(vec![
            ("a", Some(Value::Boolean(true))),
            ("b", Some(Value::Integer(vec![2]))),
        ])
    );

    let (absent, _) = decode_der(&hex!("3003 0101FF"), &schema).unwrap();
    assert_eq!(
        absent,
        Value::Structure(vec![("a", Some(Value::Boolean(true))), ("b", None)])
    );
}

#[test]
fn recursive_schema_via_rc_decodes_nested_lists() {
    // A cyclic schema tree: a SEQUENCE OF itself, modeling `Nested ::= SEQUENCE OF Nested`.
    use der_schema::SchemaKind;
    use std::rc::Rc;

    fn nested(depth: u32) -> Rc<Schema> {
        if depth == 0 {
            Schema::sequence_of(Schema::null())
        } else {
            Schema::sequence_of(nested(depth - 1))
        }
    }

    let schema = nested(2);
    assert_eq!(schema.kind(), SchemaKind::SequenceOf);

    // SEQUENCE OF { SEQUENCE OF { SEQUENCE OF {} } }
    let (value, _) = decode_der(&hex!("3002 3000"), &schema).unwrap();
    assert_eq!(value, Value::List(vec![Value::List(vec![])]));
}
