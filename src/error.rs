//! Decoding errors.

use crate::{Length, Tag};
use core::fmt;

/// Result type with this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// A decoding failure, tagged with the byte offset at which it was detected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    position: Length,
}

impl Error {
    /// Construct a new error at the given byte offset.
    pub fn new(kind: ErrorKind, position: Length) -> Self {
        Self { kind, position }
    }

    /// The kind of failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind.clone()
    }

    /// Byte offset at which the failure was detected, relative to the start
    /// of the innermost TLV content reader active at that point — not the
    /// original substrate. A failure inside a nested SEQUENCE field, for
    /// example, is reported relative to that field's own content, not the
    /// outermost TLV's.
    pub fn position(&self) -> Length {
        self.position
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte offset {})", self.kind, self.position)
    }
}

impl std::error::Error for Error {}

/// The distinguishing kind of a [`Error`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Cursor read past the end of the available bytes.
    InsufficientData,

    /// Tag number &ge; 31 (long-form tag encoding).
    LongFormTagUnsupported,

    /// Length octet `0x80` (indefinite length, BER-only).
    IndefiniteLengthForbidden,

    /// Length octet `0xFF`, reserved by X.690.
    ReservedLength,

    /// Length was encoded in long form when short form would have sufficed,
    /// or the long-form octets themselves carry a redundant leading zero.
    NonMinimalLength,

    /// A length value too large to represent on this platform.
    Overflow,

    /// The identifier octet did not match the schema's expected tag.
    TagMismatch {
        /// Tag the schema required.
        expected: Tag,
        /// Tag actually present on the wire.
        actual: Tag,
    },

    /// A primitive universal type was encoded using the constructed form.
    ConstructedFormForbidden,

    /// BOOLEAN content octet was neither `0x00` nor `0xFF`.
    BooleanNonCanonical,

    /// INTEGER or ENUMERATED content carried a redundant leading octet.
    IntegerNonMinimal,

    /// An OBJECT IDENTIFIER sub-identifier's base-128 encoding carried a
    /// redundant leading `0x80` continuation octet.
    ObjectIdentifierNonMinimal,

    /// BIT STRING unused-bit padding bits were nonzero.
    BitStringPadBitsNonZero,

    /// BIT STRING with named bits did not trim trailing zero bits.
    NamedBitStringNonMinimal,

    /// NULL carried nonempty content.
    NullNonEmpty,

    /// A restricted character string contained a byte outside its alphabet,
    /// or malformed UTF-8.
    IllegalCharacter,

    /// A TLV's content cursor was not fully consumed by its validator.
    TrailingContentBytes,

    /// Bytes remained in the substrate after the outer TLV was decoded.
    TrailingDataAfterTLV,

    /// A required SEQUENCE/SET field was absent.
    MissingRequiredField,

    /// An extra TLV appeared in a SEQUENCE/SET beyond its schema fields.
    UnexpectedTrailingField,

    /// SET members were not encoded in ascending tag-number order.
    SetMembersMisordered,

    /// SET OF elements were not encoded in ascending byte-lexical order.
    SetOfMembersMisordered,

    /// SEQUENCE OF / SET OF / string size fell outside a declared bound.
    SizeConstraintViolated,

    /// A DEFAULT field was encoded with a value equal to its default.
    DefaultValueEncoded,

    /// No CHOICE alternative matched the peeked tag.
    NoChoiceAlternative,

    /// Recursion depth exceeded `MAX_DEPTH`.
    RecursionLimitExceeded,
}

impl ErrorKind {
    /// Attach a byte offset to this kind, producing an [`Error`].
    pub fn at(self, position: Length) -> Error {
        Error::new(self, position)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InsufficientData => write!(f, "insufficient data"),
            ErrorKind::LongFormTagUnsupported => write!(f, "long-form tag numbers are not supported"),
            ErrorKind::IndefiniteLengthForbidden => write!(f, "indefinite length is forbidden in DER"),
            ErrorKind::ReservedLength => write!(f, "length octet 0xFF is reserved"),
            ErrorKind::NonMinimalLength => write!(f, "length is not minimally encoded"),
            ErrorKind::Overflow => write!(f, "length overflows platform size"),
            ErrorKind::TagMismatch { expected, actual } => {
                write!(f, "expected tag {expected}, got {actual}")
            }
            ErrorKind::ConstructedFormForbidden => write!(f, "primitive type encoded in constructed form"),
            ErrorKind::BooleanNonCanonical => write!(f, "BOOLEAN content is not 0x00 or 0xFF"),
            ErrorKind::IntegerNonMinimal => write!(f, "INTEGER is not minimally encoded"),
            ErrorKind::ObjectIdentifierNonMinimal => {
                write!(f, "OBJECT IDENTIFIER sub-identifier is not minimally encoded")
            }
            ErrorKind::BitStringPadBitsNonZero => write!(f, "BIT STRING padding bits are nonzero"),
            ErrorKind::NamedBitStringNonMinimal => {
                write!(f, "named BIT STRING has untrimmed trailing zero bits")
            }
            ErrorKind::NullNonEmpty => write!(f, "NULL has nonempty content"),
            ErrorKind::IllegalCharacter => write!(f, "character outside the permitted alphabet"),
            ErrorKind::TrailingContentBytes => write!(f, "TLV content longer than consumed"),
            ErrorKind::TrailingDataAfterTLV => write!(f, "trailing data after outer TLV"),
            ErrorKind::MissingRequiredField => write!(f, "required field missing"),
            ErrorKind::UnexpectedTrailingField => write!(f, "unexpected trailing field"),
            ErrorKind::SetMembersMisordered => write!(f, "SET members are not tag-sorted"),
            ErrorKind::SetOfMembersMisordered => write!(f, "SET OF elements are not byte-sorted"),
            ErrorKind::SizeConstraintViolated => write!(f, "size constraint violated"),
            ErrorKind::DefaultValueEncoded => write!(f, "DEFAULT field encoded with its default value"),
            ErrorKind::NoChoiceAlternative => write!(f, "no CHOICE alternative matches"),
            ErrorKind::RecursionLimitExceeded => write!(f, "recursion limit exceeded"),
        }
    }
}
