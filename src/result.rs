use thiserror::Error;

use crate::primitive::PrimitiveKind;

pub type Result<A, E = Error> = std::result::Result<A, E>;

pub type ValidationError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    // --- compile-time ---
    #[error("field `{0}` is missing a required length annotation")]
    MissingLength(&'static str),
    #[error("padding field `{0}` has an explicit length of zero; minimum width is 1")]
    ZeroLengthPadding(&'static str),
    #[error("outlet field `{field}` has no computed-value provider named `{stem}`")]
    OutletMismatch { field: &'static str, stem: &'static str },
    #[error("field `{0}` has an unresolvable descriptor kind")]
    UnknownKind(&'static str),
    #[error("duplicate field name `{0}` in record layout")]
    DuplicateField(&'static str),

    // --- pack/unpack time ---
    #[error("integer value {value} is out of range for {kind}")]
    IntegerRange { kind: PrimitiveKind, value: i128 },
    #[error("character {0:?} does not encode to exactly one byte")]
    CharEncoding(char),
    #[error("field did not decode to a value matching its descriptor")]
    KindValueMismatch,
    #[error("string field failed to decode: {0}")]
    StringDecode(#[from] std::string::FromUtf8Error),
    #[error("string {0:?} is not ASCII, but the field is declared `Ascii`")]
    NonAsciiString(String),
    #[error("value is {actual} bytes, exceeding the fixed `Bytes` width of {max}")]
    BytesOverflow { actual: usize, max: usize },
    #[error("array has {actual} elements, exceeding the fixed count of {max}")]
    ArrayOverflow { actual: usize, max: usize },
    #[error("array has {actual} elements, short of the fixed count of {min} with no filler policy")]
    ArrayUnderflow { actual: usize, min: usize },
    #[error("byte string is {actual} bytes, expected exactly {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("no union member matched: {0:?}")]
    UnionNoMatch(Vec<String>),

    // --- ambient ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] declio::Error),
    #[error("validation failed: {0}")]
    Validation(ValidationError),
}
