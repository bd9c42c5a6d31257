//! The schema object model the decode core drives against.
//!
//! The distilled specification treats the schema object model as an
//! external collaborator reached only through the [`SchemaAdapter`] trait.
//! This module supplies this crate's own reference implementation of that
//! collaborator — a closed-enum [`Schema`] tree — so the crate is runnable
//! and testable on its own; the decode core in [`crate::decode`] never
//! assumes `Schema` is the only possible implementor.

use crate::{Class, Form, Tag};
use std::rc::Rc;

/// The kind of ASN.1 type a [`Schema`] node describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchemaKind {
    /// `BOOLEAN`
    Boolean,
    /// `INTEGER`
    Integer,
    /// `BIT STRING`
    BitString,
    /// `OCTET STRING`
    OctetString,
    /// `NULL`
    Null,
    /// `OBJECT IDENTIFIER`
    ObjectIdentifier,
    /// `ENUMERATED`
    Enumerated,
    /// `UTF8String`
    Utf8String,
    /// `PrintableString`
    PrintableString,
    /// `IA5String`
    Ia5String,
    /// `NumericString`
    NumericString,
    /// `VisibleString`
    VisibleString,
    /// `TeletexString`
    TeletexString,
    /// `UniversalString`
    UniversalString,
    /// `BMPString`
    BmpString,
    /// `GeneralString`
    GeneralString,
    /// `GraphicString`
    GraphicString,
    /// `UTCTime`
    UtcTime,
    /// `GeneralizedTime`
    GeneralizedTime,
    /// `SEQUENCE`
    Sequence,
    /// `SET`
    Set,
    /// `SEQUENCE OF`
    SequenceOf,
    /// `SET OF`
    SetOf,
    /// `CHOICE`
    Choice,
    /// `ANY` — accepts whatever tag arrives, preserving the raw TLV bytes.
    Any,
}

impl SchemaKind {
    /// The universal tag number naturally associated with this kind, or
    /// `None` for kinds with no fixed universal tag (`CHOICE`, `ANY`).
    pub fn universal_tag_number(self) -> Option<u8> {
        use SchemaKind::*;
        Some(match self {
            Boolean => Tag::BOOLEAN,
            Integer => Tag::INTEGER,
            BitString => Tag::BIT_STRING,
            OctetString => Tag::OCTET_STRING,
            Null => Tag::NULL,
            ObjectIdentifier => Tag::OBJECT_IDENTIFIER,
            Enumerated => Tag::ENUMERATED,
            Utf8String => Tag::UTF8_STRING,
            PrintableString => Tag::PRINTABLE_STRING,
            Ia5String => Tag::IA5_STRING,
            NumericString => Tag::NUMERIC_STRING,
            VisibleString => Tag::VISIBLE_STRING,
            TeletexString => Tag::TELETEX_STRING,
            UniversalString => Tag::UNIVERSAL_STRING,
            BmpString => Tag::BMP_STRING,
            GeneralString => Tag::GENERAL_STRING,
            GraphicString => Tag::GRAPHIC_STRING,
            UtcTime => Tag::UTC_TIME,
            GeneralizedTime => Tag::GENERALIZED_TIME,
            Sequence => Tag::SEQUENCE,
            Set => Tag::SET,
            SequenceOf => Tag::SEQUENCE,
            SetOf => Tag::SET,
            Choice | Any => return None,
        })
    }

    /// Is this a restricted character-string kind?
    pub fn is_character_string(self) -> bool {
        use SchemaKind::*;
        matches!(
            self,
            Utf8String
                | PrintableString
                | Ia5String
                | NumericString
                | VisibleString
                | TeletexString
                | UniversalString
                | BmpString
                | GeneralString
                | GraphicString
        )
    }
}

/// A named bit position within a `BIT STRING`, per ASN.1 `NamedBitList`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamedBit {
    /// The symbolic name.
    pub name: &'static str,
    /// Bit position, counting from the most significant bit of the first
    /// content octet (bit 0).
    pub position: u32,
}

/// Whether a `SEQUENCE`/`SET` field is required, optional, or carries a
/// DER default.
#[derive(Clone, Debug, PartialEq)]
pub enum Presence {
    /// Must be present on the wire.
    Required,
    /// May be absent.
    Optional,
    /// Must be absent when it would equal `default`; DER forbids encoding
    /// the default value explicitly.
    Default(Value),
}

/// One named member of a `SEQUENCE` or `SET`.
#[derive(Clone, Debug)]
pub struct Field {
    /// Field name.
    pub name: &'static str,
    /// The field's schema.
    pub schema: Rc<Schema>,
    /// Required / optional / default.
    pub presence: Presence,
}

impl Field {
    /// A required field.
    pub fn required(name: &'static str, schema: Rc<Schema>) -> Self {
        Self { name, schema, presence: Presence::Required }
    }

    /// An `OPTIONAL` field.
    pub fn optional(name: &'static str, schema: Rc<Schema>) -> Self {
        Self { name, schema, presence: Presence::Optional }
    }

    /// A field carrying a `DEFAULT` value.
    pub fn with_default(name: &'static str, schema: Rc<Schema>, default: Value) -> Self {
        Self { name, schema, presence: Presence::Default(default) }
    }
}

/// An inclusive size bound, as imposed on `SEQUENCE OF` / `SET OF` /
/// string lengths by an ASN.1 `SIZE` constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SizeConstraint {
    /// Minimum permitted size (inclusive).
    pub min: usize,
    /// Maximum permitted size (inclusive), or `None` for unbounded.
    pub max: Option<usize>,
}

impl SizeConstraint {
    /// `SIZE(min..MAX)`.
    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Does `len` satisfy this constraint?
    pub fn allows(&self, len: usize) -> bool {
        len >= self.min && self.max.map_or(true, |max| len <= max)
    }
}

/// An IMPLICIT or EXPLICIT context-specific tag overlay applied to a field.
///
/// A field may carry several overlays; they apply outermost-first, i.e. the
/// first element of the field's overlay list is the tag actually seen on
/// the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagOverlay {
    /// Replace the base type's tag, keeping its natural form.
    Implicit(u8),
    /// Wrap the base TLV in an additional constructed TLV.
    Explicit(u8),
}

/// A schema node: the (recursively defined) description of an expected
/// ASN.1 type, consumed by the decode core through [`SchemaAdapter`].
#[derive(Clone, Debug)]
pub struct Schema {
    kind: SchemaKind,
    overlays: Vec<TagOverlay>,
    fields: Vec<Field>,
    component: Option<Rc<Schema>>,
    named_bits: Vec<NamedBit>,
    alternatives: Vec<(&'static str, Tag, Rc<Schema>)>,
    size_constraint: Option<SizeConstraint>,
}

macro_rules! simple_kind_ctor {
    ($($fn_name:ident => $kind:ident),+ $(,)?) => {
        $(
            #[doc = concat!("A bare `", stringify!($kind), "` schema node.")]
            pub fn $fn_name() -> Rc<Schema> {
                Rc::new(Schema::leaf(SchemaKind::$kind))
            }
        )+
    };
}

impl Schema {
    fn leaf(kind: SchemaKind) -> Self {
        Self {
            kind,
            overlays: Vec::new(),
            fields: Vec::new(),
            component: None,
            named_bits: Vec::new(),
            alternatives: Vec::new(),
            size_constraint: None,
        }
    }

    simple_kind_ctor! {
        boolean => Boolean,
        integer => Integer,
        bit_string => BitString,
        octet_string => OctetString,
        null => Null,
        object_identifier => ObjectIdentifier,
        enumerated => Enumerated,
        utf8_string => Utf8String,
        printable_string => PrintableString,
        ia5_string => Ia5String,
        numeric_string => NumericString,
        visible_string => VisibleString,
        teletex_string => TeletexString,
        universal_string => UniversalString,
        bmp_string => BmpString,
        general_string => GeneralString,
        graphic_string => GraphicString,
        utc_time => UtcTime,
        generalized_time => GeneralizedTime,
        any => Any,
    }

    /// A `BIT STRING` with named bits; DER requires trailing zero named
    /// bits to be trimmed.
    pub fn bit_string_named(named_bits: Vec<NamedBit>) -> Rc<Schema> {
        Rc::new(Self { named_bits, ..Self::leaf(SchemaKind::BitString) })
    }

    /// A `SEQUENCE` with the given ordered fields.
    pub fn sequence(fields: Vec<Field>) -> Rc<Schema> {
        Rc::new(Self { fields, ..Self::leaf(SchemaKind::Sequence) })
    }

    /// A `SET` with the given fields (source order; DER requires tag-sorted
    /// wire order regardless of this order).
    pub fn set(fields: Vec<Field>) -> Rc<Schema> {
        Rc::new(Self { fields, ..Self::leaf(SchemaKind::Set) })
    }

    /// A `SEQUENCE OF` the given component schema.
    pub fn sequence_of(component: Rc<Schema>) -> Rc<Schema> {
        Rc::new(Self { component: Some(component), ..Self::leaf(SchemaKind::SequenceOf) })
    }

    /// A `SEQUENCE OF` with a size constraint (e.g. `SIZE(1..MAX)`).
    pub fn sequence_of_sized(component: Rc<Schema>, size: SizeConstraint) -> Rc<Schema> {
        Rc::new(Self {
            component: Some(component),
            size_constraint: Some(size),
            ..Self::leaf(SchemaKind::SequenceOf)
        })
    }

    /// A `SET OF` the given component schema.
    pub fn set_of(component: Rc<Schema>) -> Rc<Schema> {
        Rc::new(Self { component: Some(component), ..Self::leaf(SchemaKind::SetOf) })
    }

    /// A `SET OF` with a size constraint.
    pub fn set_of_sized(component: Rc<Schema>, size: SizeConstraint) -> Rc<Schema> {
        Rc::new(Self {
            component: Some(component),
            size_constraint: Some(size),
            ..Self::leaf(SchemaKind::SetOf)
        })
    }

    /// A `CHOICE` among the given `(name, tag, alternative)` triples.
    pub fn choice(alternatives: Vec<(&'static str, Tag, Rc<Schema>)>) -> Rc<Schema> {
        Rc::new(Self { alternatives, ..Self::leaf(SchemaKind::Choice) })
    }

    /// Apply an IMPLICIT context-specific tag overlay (outermost) to a
    /// schema node.
    pub fn implicit(number: u8, inner: Rc<Schema>) -> Rc<Schema> {
        Self::overlay(TagOverlay::Implicit(number), inner)
    }

    /// Apply an EXPLICIT context-specific tag overlay (outermost) to a
    /// schema node.
    pub fn explicit(number: u8, inner: Rc<Schema>) -> Rc<Schema> {
        Self::overlay(TagOverlay::Explicit(number), inner)
    }

    fn overlay(overlay: TagOverlay, inner: Rc<Schema>) -> Rc<Schema> {
        let mut cloned = (*inner).clone();
        cloned.overlays.insert(0, overlay);
        Rc::new(cloned)
    }

    /// This node's kind, ignoring tag overlays.
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// This node with its outermost tag overlay stripped, for decoding the
    /// next layer in (used while peeling nested IMPLICIT/EXPLICIT
    /// overlays).
    pub(crate) fn without_outermost_overlay(&self) -> Schema {
        let mut rest = self.clone();
        if !rest.overlays.is_empty() {
            rest.overlays.remove(0);
        }
        rest
    }

    /// Tag overlays, outermost-first.
    pub fn overlays(&self) -> &[TagOverlay] {
        &self.overlays
    }

    /// Ordered fields, for `SEQUENCE`/`SET`.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Component schema, for `SEQUENCE OF`/`SET OF`.
    pub fn component(&self) -> Option<&Rc<Schema>> {
        self.component.as_ref()
    }

    /// Named bits, for `BIT STRING`.
    pub fn named_bits(&self) -> &[NamedBit] {
        &self.named_bits
    }

    /// `(name, tag, alternative)` triples, for `CHOICE`.
    pub fn alternatives(&self) -> &[(&'static str, Tag, Rc<Schema>)] {
        &self.alternatives
    }

    /// Find the `CHOICE` alternative whose tag matches `(class, number)`.
    pub fn alternative_for(&self, class: Class, number: u8) -> Option<(&'static str, &Rc<Schema>)> {
        self.alternatives
            .iter()
            .find(|(_, tag, _)| tag.class == class && tag.number == number)
            .map(|(name, _, schema)| (*name, schema))
    }

    /// Declared size constraint, if any.
    pub fn size_constraint(&self) -> Option<SizeConstraint> {
        self.size_constraint
    }

    /// The base universal tag for this node's kind, before any overlay is
    /// applied. `None` for `CHOICE`/`ANY`, which have no fixed tag of their
    /// own.
    pub fn base_tag(&self) -> Option<Tag> {
        let number = self.kind.universal_tag_number()?;
        let form = if matches!(self.kind, SchemaKind::Sequence | SchemaKind::Set | SchemaKind::SequenceOf | SchemaKind::SetOf) {
            Form::Constructed
        } else {
            Form::Primitive
        };
        Some(Tag { class: Class::Universal, form, number })
    }
}

/// The boundary between the decode core and a schema object model.
///
/// The distilled specification keeps the schema object model itself out of
/// scope: the core is meant to speak to *some* schema library only through
/// capabilities like these. This crate's own [`Schema`] implements the
/// trait directly; a caller embedding a different schema library need only
/// provide its own implementation to reuse the decode core unchanged.
pub trait SchemaAdapter {
    /// This node's kind, ignoring tag overlays.
    fn kind(&self) -> SchemaKind;
    /// Tag overlays, outermost-first.
    fn overlays(&self) -> &[TagOverlay];
    /// The base universal tag for this node's kind, before overlays.
    fn base_tag(&self) -> Option<Tag>;
    /// Ordered fields, for `SEQUENCE`/`SET`.
    fn fields(&self) -> &[Field];
    /// Component schema, for `SEQUENCE OF`/`SET OF`.
    fn component(&self) -> Option<&Rc<Schema>>;
    /// Named bits, for `BIT STRING`.
    fn named_bits(&self) -> &[NamedBit];
    /// Find the `CHOICE` alternative matching `(class, number)`.
    fn alternative_for(&self, class: Class, number: u8) -> Option<(&'static str, &Rc<Schema>)>;
    /// Declared size constraint, if any.
    fn size_constraint(&self) -> Option<SizeConstraint>;
}

impl SchemaAdapter for Schema {
    fn kind(&self) -> SchemaKind {
        Schema::kind(self)
    }

    fn overlays(&self) -> &[TagOverlay] {
        Schema::overlays(self)
    }

    fn base_tag(&self) -> Option<Tag> {
        Schema::base_tag(self)
    }

    fn fields(&self) -> &[Field] {
        Schema::fields(self)
    }

    fn component(&self) -> Option<&Rc<Schema>> {
        Schema::component(self)
    }

    fn named_bits(&self) -> &[NamedBit] {
        Schema::named_bits(self)
    }

    fn alternative_for(&self, class: Class, number: u8) -> Option<(&'static str, &Rc<Schema>)> {
        Schema::alternative_for(self, class, number)
    }

    fn size_constraint(&self) -> Option<SizeConstraint> {
        Schema::size_constraint(self)
    }
}

/// A decoded ASN.1 value, built by the decode core as it validates each TLV
/// against a [`Schema`] node.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `BOOLEAN`
    Boolean(bool),
    /// `INTEGER` / `ENUMERATED`, stored as validated two's-complement
    /// big-endian bytes (arbitrary precision; see [`Value::to_i128`] for a
    /// fixed-width view).
    Integer(Vec<u8>),
    /// `BIT STRING`: unused-bit count (0..=7) plus value octets.
    BitString {
        /// Number of unused low-order bits in the final value octet.
        unused_bits: u8,
        /// Value octets, padding bits included.
        bytes: Vec<u8>,
    },
    /// `OCTET STRING`
    OctetString(Vec<u8>),
    /// `NULL`
    Null,
    /// `OBJECT IDENTIFIER`, as its dotted arcs.
    ObjectIdentifier(Vec<u64>),
    /// A restricted character string (`UTF8String`, `PrintableString`, …).
    CharacterString(String),
    /// A restricted string kind that is not a valid `str` (e.g.
    /// `TeletexString`, `UniversalString`, `BMPString`), kept as raw bytes.
    OctetBackedString(Vec<u8>),
    /// `UTCTime` / `GeneralizedTime`, stored in normalized `YYYYMMDDHHMMSS[.f*]Z` form.
    Time(String),
    /// `SEQUENCE` / `SET`, field name paired with decoded value, in schema
    /// field order.
    Structure(Vec<(&'static str, Option<Value>)>),
    /// `SEQUENCE OF` / `SET OF`
    List(Vec<Value>),
    /// `CHOICE`: the matched alternative's field name and decoded value.
    Choice(&'static str, Box<Value>),
    /// `ANY`: the raw, complete TLV bytes.
    Any(Vec<u8>),
}

impl Value {
    /// View an `Integer`/`Enumerated` value as an `i128`, if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        let Value::Integer(bytes) = self else { return None };
        if bytes.len() > 16 {
            return None;
        }
        let negative = bytes[0] & 0x80 != 0;
        let mut buf = [if negative { 0xFF } else { 0x00 }; 16];
        buf[16 - bytes.len()..].copy_from_slice(bytes);
        Some(i128::from_be_bytes(buf))
    }
}
