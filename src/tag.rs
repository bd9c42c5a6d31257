//! ASN.1 tags.

use crate::{ErrorKind, Reader, Result};
use core::fmt;

/// Tag class, the top two bits of a DER identifier octet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Class {
    /// Universal types defined by X.680 (BOOLEAN, INTEGER, SEQUENCE, ...).
    Universal,
    /// Application-specific tag.
    Application,
    /// Context-specific tag (the common case for schema overlays).
    ContextSpecific,
    /// Private tag.
    Private,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::ContextSpecific => "CONTEXT",
            Class::Private => "PRIVATE",
        };
        f.write_str(s)
    }
}

/// Tag form: whether the content octets hold a raw value (primitive) or a
/// sequence of nested TLVs (constructed).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Form {
    /// Content octets are the value itself.
    Primitive,
    /// Content octets are nested TLVs.
    Constructed,
}

/// A parsed DER identifier: `(class, form, number)`.
///
/// `number` is always in `[0, 30]`; tag number 31 (the long-form escape) is
/// rejected at decode time and never appears in a live `Tag`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Tag {
    /// Tag class.
    pub class: Class,
    /// Primitive or constructed form.
    pub form: Form,
    /// Tag number, `0..=30`.
    pub number: u8,
}

/// Universal tag numbers as assigned by X.680.
impl Tag {
    /// `BOOLEAN` universal tag number.
    pub const BOOLEAN: u8 = 0x01;
    /// `INTEGER` universal tag number.
    pub const INTEGER: u8 = 0x02;
    /// `BIT STRING` universal tag number.
    pub const BIT_STRING: u8 = 0x03;
    /// `OCTET STRING` universal tag number.
    pub const OCTET_STRING: u8 = 0x04;
    /// `NULL` universal tag number.
    pub const NULL: u8 = 0x05;
    /// `OBJECT IDENTIFIER` universal tag number.
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    /// `ENUMERATED` universal tag number.
    pub const ENUMERATED: u8 = 0x0A;
    /// `UTF8String` universal tag number.
    pub const UTF8_STRING: u8 = 0x0C;
    /// `SEQUENCE` / `SEQUENCE OF` universal tag number.
    pub const SEQUENCE: u8 = 0x10;
    /// `SET` / `SET OF` universal tag number.
    pub const SET: u8 = 0x11;
    /// `NumericString` universal tag number.
    pub const NUMERIC_STRING: u8 = 0x12;
    /// `PrintableString` universal tag number.
    pub const PRINTABLE_STRING: u8 = 0x13;
    /// `TeletexString` universal tag number.
    pub const TELETEX_STRING: u8 = 0x14;
    /// `IA5String` universal tag number.
    pub const IA5_STRING: u8 = 0x16;
    /// `UTCTime` universal tag number.
    pub const UTC_TIME: u8 = 0x17;
    /// `GeneralizedTime` universal tag number.
    pub const GENERALIZED_TIME: u8 = 0x18;
    /// `GraphicString` universal tag number.
    pub const GRAPHIC_STRING: u8 = 0x19;
    /// `VisibleString` universal tag number.
    pub const VISIBLE_STRING: u8 = 0x1A;
    /// `GeneralString` universal tag number.
    pub const GENERAL_STRING: u8 = 0x1B;
    /// `UniversalString` universal tag number.
    pub const UNIVERSAL_STRING: u8 = 0x1C;
    /// `BMPString` universal tag number.
    pub const BMP_STRING: u8 = 0x1E;

    /// Construct a universal-class tag with the natural form for the given
    /// universal tag number (constructed for SEQUENCE/SET, primitive
    /// otherwise).
    pub const fn universal(number: u8) -> Self {
        let form = if matches!(number, Self::SEQUENCE | Self::SET) {
            Form::Constructed
        } else {
            Form::Primitive
        };
        Self { class: Class::Universal, form, number }
    }

    /// Construct a context-specific tag with the given number and form.
    pub const fn context_specific(number: u8, form: Form) -> Self {
        Self { class: Class::ContextSpecific, form, number }
    }

    /// Decode a single DER identifier octet.
    pub(crate) fn decode<'r>(reader: &mut impl Reader<'r>) -> Result<Self> {
        let position = reader.position();
        let byte = reader.read_byte()?;

        let number = byte & 0x1F;
        if number == 0x1F {
            return Err(ErrorKind::LongFormTagUnsupported.at(position));
        }

        let class = match byte >> 6 {
            0b00 => Class::Universal,
            0b01 => Class::Application,
            0b10 => Class::ContextSpecific,
            0b11 => Class::Private,
            _ => unreachable!(),
        };
        let form = if byte & 0x20 != 0 { Form::Constructed } else { Form::Primitive };

        Ok(Self { class, form, number })
    }

    /// Same `(class, number)` but with the given form.
    pub fn with_form(self, form: Form) -> Self {
        Self { form, ..self }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.class, self.number)
    }
}
