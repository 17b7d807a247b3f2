use std::fmt;

use crate::chars;
use crate::Error;

/// Inner List: a parenthesized sequence of Items.
pub type InnerList = Vec<Item>;

/// List: the top-level comma-separated sequence of Items.
pub type List = Vec<Item>;

/// Represents Structured Field Value data types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer represents Integers.
    Integer(i64),
    /// Decimal represents Decimals.  At most 3 fractional digits
    /// survive serialization.
    Decimal(f64),
    /// String represents Strings, printable ASCII only.
    String(String),
    /// Token represents Tokens.
    Token(Token),
    /// ByteSeq represents Byte Sequences.
    ByteSeq(Vec<u8>),
    /// Bool represents Booleans.
    Bool(bool),
    /// Date represents Dates as seconds since the Unix epoch.
    Date(i64),
    /// DispString represents Display Strings.
    DispString(String),
    /// InnerList represents Inner lists.  Only allowed as the value of
    /// a List member or a Dictionary member.
    InnerList(InnerList),
}

impl Value {
    /// Returns the Integer, or None for any other kind.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the Decimal, or None for any other kind.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the String, or None for any other kind.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the Token, or None for any other kind.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Value::Token(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the decoded Byte Sequence, or None for any other kind.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteSeq(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the Boolean, or None for any other kind.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the Date, or None for any other kind.
    pub fn as_date(&self) -> Option<i64> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the Display String, or None for any other kind.
    pub fn as_display_string(&self) -> Option<&str> {
        match self {
            Value::DispString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the Inner List members, or None for any other kind.
    pub fn as_inner_list(&self) -> Option<&[Item]> {
        match self {
            Value::InnerList(l) => Some(l),
            _ => None,
        }
    }

    pub(crate) fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => {
                write!(f, "<Integer>{{{v}}}")
            }
            Value::Decimal(v) => {
                write!(f, "<Decimal>{{{v}}}")
            }
            Value::String(s) => {
                write!(f, "<String>{{{s:?}}}")
            }
            Value::Token(t) => {
                write!(f, "<Token>{{{t}}}")
            }
            Value::ByteSeq(b) => {
                write!(f, "<ByteSeq>{{{} bytes}}", b.len())
            }
            Value::Bool(v) => {
                write!(f, "<Bool>{{{v}}}")
            }
            Value::Date(v) => {
                write!(f, "<Date>{{{v}}}")
            }
            Value::DispString(s) => {
                write!(f, "<DispString>{{{s:?}}}")
            }
            Value::InnerList(l) => {
                write!(f, "<InnerList>{{{} items}}", l.len())
            }
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, u8, i16, u16, i32, u32, i64);

macro_rules! impl_try_from_int {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for Value {
                type Error = Error;

                fn try_from(v: $t) -> Result<Self, Error> {
                    Ok(Value::Integer(i64::try_from(v)?))
                }
            }
        )*
    };
}

impl_try_from_int!(u64, usize, isize, i128);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Decimal(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Decimal(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Token> for Value {
    fn from(v: Token) -> Self {
        Value::Token(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::ByteSeq(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::ByteSeq(v.to_vec())
    }
}

impl From<InnerList> for Value {
    fn from(v: InnerList) -> Self {
        Value::InnerList(v)
    }
}

/// A Token.  Construction does not validate; the serializer rejects
/// tokens that do not match `[A-Za-z*][A-Za-z0-9:/!#$%&'*+.^_`|~-]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Creates new Token with the given text.
    pub fn new(s: impl Into<String>) -> Self {
        Token(s.into())
    }

    /// Returns the Token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reports whether the Token would be accepted by the serializer.
    pub fn is_valid(&self) -> bool {
        chars::is_valid_token(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token(s.to_owned())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bare item or Inner List together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Bare item, or an Inner List for List and Dictionary members.
    pub value: Value,
    /// Parameters attached to the value.
    pub params: Parameters,
}

impl Item {
    /// Creates new Item with the given value and no parameters.
    pub fn new(value: impl Into<Value>) -> Self {
        Item {
            value: value.into(),
            params: Parameters::new(),
        }
    }

    /// Creates new Item with the given value and parameters.
    pub fn with_params(value: impl Into<Value>, params: Parameters) -> Self {
        Item {
            value: value.into(),
            params,
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::new(value)
    }
}

/// A key/value pair of Parameters.  Keys match `[a-z*][a-z0-9_.*-]*`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub key: String,
    /// Bare item; never an Inner List.
    pub value: Value,
}

/// A key/item pair of a Dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DictMember {
    /// Member name.
    pub key: String,
    /// Member value with its parameters.
    pub item: Item,
}

// Parameters and Dictionary share the ordered-map behaviour: keys are
// unique, a repeated key overwrites the value at its first position.
// Lookups scan linearly; real fields carry a handful of entries.
macro_rules! ordered_map {
    ($(#[$meta:meta])* $name:ident, $entry:ident, $val:ident: $vty:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(Vec<$entry>);

        impl $name {
            /// Creates new empty map.
            pub fn new() -> Self {
                $name(Vec::new())
            }

            /// Returns the value of the last entry with `key`.
            pub fn get(&self, key: &str) -> Option<&$vty> {
                self.0.iter().rev().find(|e| e.key == key).map(|e| &e.$val)
            }

            /// Reports whether an entry with `key` exists.
            pub fn contains_key(&self, key: &str) -> bool {
                self.0.iter().any(|e| e.key == key)
            }

            /// Sets `key` to `value`.  An existing entry keeps its
            /// position and its old value is returned.
            pub fn insert(&mut self, key: impl Into<String>, value: impl Into<$vty>) -> Option<$vty> {
                let key = key.into();
                let value = value.into();

                match self.0.iter_mut().find(|e| e.key == key) {
                    Some(e) => Some(std::mem::replace(&mut e.$val, value)),
                    None => {
                        self.0.push($entry { key, $val: value });
                        None
                    }
                }
            }

            /// Returns the number of entries.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Reports whether the map has no entries.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Iterates over the entries in order.
            pub fn iter(&self) -> std::slice::Iter<'_, $entry> {
                self.0.iter()
            }

            /// Writes `entry` at `idx` or appends it when `idx` is
            /// `None`.  Used by the parser, which keeps its own key
            /// index.
            pub(crate) fn put(&mut self, idx: Option<usize>, entry: $entry) -> usize {
                match idx {
                    Some(i) => {
                        self.0[i] = entry;
                        i
                    }
                    None => {
                        self.0.push(entry);
                        self.0.len() - 1
                    }
                }
            }
        }

        impl<K: Into<String>, V: Into<$vty>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut m = $name::new();
                for (k, v) in iter {
                    m.insert(k, v);
                }
                m
            }
        }

        impl IntoIterator for $name {
            type Item = $entry;
            type IntoIter = std::vec::IntoIter<$entry>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $entry;
            type IntoIter = std::slice::Iter<'a, $entry>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

ordered_map!(
    /// Parameters: an ordered map of keys to bare items.
    Parameters, Parameter, value: Value
);

ordered_map!(
    /// Dictionary: an ordered map of keys to Items.
    Dictionary, DictMember, item: Item
);
