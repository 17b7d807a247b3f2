//! [RFC 9651](https://datatracker.ietf.org/doc/html/rfc9651)
//! Structured Field Values decoder and serializer.
//!
//! Decoding takes every field line of one header, in order, and treats
//! them as if they were joined with `", "`.  Serializing always produces
//! the single canonical form of a value tree.
//!
//! This is an example of handling [RFC
//! 9218](https://datatracker.ietf.org/doc/html/rfc9218) Priority
//! header field:
//!
//! ```
//! use sfcodec::{Dictionary, Item};
//!
//! let dict = sfcodec::decode_dictionary(&["u=2", "i"]).unwrap();
//!
//! let urgency = match dict.get("u").and_then(|m| m.value.as_integer()) {
//!     Some(v) if (0..=7).contains(&v) => v,
//!     _ => 3,
//! };
//! let incremental = dict.get("i").and_then(|m| m.value.as_bool()).unwrap_or(false);
//!
//! println!("urgency={urgency} incremental={incremental}");
//!
//! let mut out = Dictionary::new();
//! out.insert("u", Item::new(urgency));
//! out.insert("i", Item::new(incremental));
//!
//! assert_eq!("u=2, i", sfcodec::encode_dictionary(&out).unwrap());
//! ```
#![warn(missing_docs)]

mod chars;
mod cursor;
mod error;
mod parser;
mod serializer;
mod value;

pub use crate::chars::is_valid_string;
pub use crate::error::Error;
pub use crate::parser::{decode_dictionary, decode_item, decode_list};
pub use crate::serializer::{encode_dictionary, encode_item, encode_list};
pub use crate::value::{
    DictMember, Dictionary, InnerList, Item, List, Parameter, Parameters, Token, Value,
};

/// Largest Integer.
pub const MAX_INTEGER: i64 = 999_999_999_999_999;
/// Smallest Integer.
pub const MIN_INTEGER: i64 = -999_999_999_999_999;

// Decimals must stay below 1e12 after rounding to three fractional
// digits.  0x1.d1a94a1fffffcp+39 = 999999999999.99951171875 rounds up
// to 1e12; its predecessor below rounds to 999999999999.999.

/// Largest Decimal, 0x1.d1a94a1fffffbp+39.
pub const MAX_DECIMAL: f64 = 999_999_999_999.999_389_648_437_5;
/// Smallest Decimal.
pub const MIN_DECIMAL: f64 = -MAX_DECIMAL;
