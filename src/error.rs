use std::num::TryFromIntError;

/// Errors encountered while decoding or encoding Structured Field
/// Values.
///
/// Positions (`index`) count bytes in the virtual stream formed by
/// joining all input fields with `", "`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A byte that the grammar does not allow at this position.
    #[error("unexpected character '{}' at position {index}", .byte.escape_ascii())]
    UnexpectedByte {
        /// The offending byte.
        byte: u8,
        /// Its position.
        index: usize,
    },
    /// The input ended while more was required.
    #[error("unexpected end of input at position {index}")]
    UnexpectedEnd {
        /// Length of the input.
        index: usize,
    },
    /// More than 15 digits in an Integer or Date.
    #[error("integer overflow at position {index}")]
    IntegerOverflow {
        /// Position of the extra digit.
        index: usize,
    },
    /// More than 12 digits before the decimal point.
    #[error("decimal overflow at position {index}")]
    DecimalOverflow {
        /// Position of the extra digit.
        index: usize,
    },
    /// More than 3 digits after the decimal point.
    #[error("decimal has too long fractional part at position {index}")]
    FractionTooLong {
        /// Position of the extra digit.
        index: usize,
    },
    /// Byte Sequence content is not valid base64.
    #[error("invalid byte sequence: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// Percent-decoded Display String is not UTF-8.
    #[error("invalid UTF-8 sequence in display string")]
    InvalidUtf8,
    /// A List or Dictionary ends with a comma.
    #[error("trailing comma is not allowed")]
    TrailingComma,
    /// Non-whitespace left after a complete top-level value.
    #[error("trailing characters at position {index}")]
    TrailingCharacters {
        /// Position of the first leftover byte.
        index: usize,
    },

    /// Integer or Date outside ±999,999,999,999,999.
    #[error("integer {0} is out of range")]
    IntegerOutOfRange(i64),
    /// Integer conversion from a wider type overflowed.
    #[error("integer does not fit in 64 bits")]
    IntegerConversion(#[from] TryFromIntError),
    /// Decimal outside `MIN_DECIMAL..=MAX_DECIMAL`.
    #[error("decimal {0} is out of range")]
    DecimalOutOfRange(f64),
    /// Decimal is NaN or infinite.
    #[error("decimal {0} is not a finite number")]
    DecimalNotFinite(f64),
    /// String holds bytes outside printable ASCII.
    #[error("string {0:?} has invalid characters")]
    InvalidString(String),
    /// Token does not match the Token grammar.
    #[error("token {0:?} has invalid characters")]
    InvalidToken(String),
    /// Parameter or Dictionary key does not match the key grammar.
    #[error("key {0:?} has invalid characters")]
    InvalidKey(String),
    /// A value of a kind that cannot be serialized at this position,
    /// e.g. an Inner List used as a parameter value.
    #[error("unsupported value: {0}")]
    UnsupportedValue(&'static str),
}
