use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, trace};

use crate::chars;
use crate::value::{Dictionary, Item, List, Parameters, Token, Value};
use crate::{Error, MAX_DECIMAL, MAX_INTEGER, MIN_DECIMAL, MIN_INTEGER};

/// Serializes an Item.  An Inner List is not an Item on its own and
/// is rejected.
///
/// ```
/// use sfcodec::{Item, Parameters, Token};
///
/// let params: Parameters = [("q", 0.5)].into_iter().collect();
/// let item = Item::with_params(Token::from("gzip"), params);
///
/// assert_eq!("gzip;q=0.5", sfcodec::encode_item(&item).unwrap());
/// ```
pub fn encode_item(item: &Item) -> Result<String, Error> {
    let mut s = Serializer::new();

    s.serialize_item(item)
        .inspect_err(|err| debug!(%err, "failed to encode item"))?;

    trace!(len = s.buf.len(), "encoded item");

    Ok(s.buf)
}

/// Serializes a List.  Members are joined by `", "`.
pub fn encode_list(list: &List) -> Result<String, Error> {
    let mut s = Serializer::new();

    s.serialize_list(list)
        .inspect_err(|err| debug!(%err, "failed to encode list"))?;

    trace!(members = list.len(), len = s.buf.len(), "encoded list");

    Ok(s.buf)
}

/// Serializes a Dictionary.  Members whose value is Boolean true are
/// written as a bare key.
///
/// ```
/// use sfcodec::{Dictionary, Item};
///
/// let dict: Dictionary = [("u", Item::new(2)), ("i", Item::new(true))].into_iter().collect();
///
/// assert_eq!("u=2, i", sfcodec::encode_dictionary(&dict).unwrap());
/// ```
pub fn encode_dictionary(dict: &Dictionary) -> Result<String, Error> {
    let mut s = Serializer::new();

    s.serialize_dict(dict)
        .inspect_err(|err| debug!(%err, "failed to encode dictionary"))?;

    trace!(members = dict.len(), len = s.buf.len(), "encoded dictionary");

    Ok(s.buf)
}

/// Serializer writes the canonical form of a value tree into its own
/// buffer.  The tree is only read.
struct Serializer {
    buf: String,
}

impl Serializer {
    fn new() -> Self {
        Serializer {
            buf: String::with_capacity(64),
        }
    }

    fn serialize_list(&mut self, list: &List) -> Result<(), Error> {
        for (i, item) in list.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }

            self.serialize_item_or_inner_list(&item.value)?;
            self.serialize_params(&item.params)?;
        }

        Ok(())
    }

    fn serialize_dict(&mut self, dict: &Dictionary) -> Result<(), Error> {
        for (i, m) in dict.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }

            self.serialize_key(&m.key)?;

            if !m.item.value.is_true() {
                self.buf.push('=');
                self.serialize_item_or_inner_list(&m.item.value)?;
            }

            self.serialize_params(&m.item.params)?;
        }

        Ok(())
    }

    fn serialize_item_or_inner_list(&mut self, v: &Value) -> Result<(), Error> {
        let Value::InnerList(list) = v else {
            return self.serialize_bare_item(v);
        };

        self.buf.push('(');

        for (i, item) in list.iter().enumerate() {
            if i > 0 {
                self.buf.push(' ');
            }

            self.serialize_item(item)?;
        }

        self.buf.push(')');

        Ok(())
    }

    fn serialize_item(&mut self, item: &Item) -> Result<(), Error> {
        self.serialize_bare_item(&item.value)?;
        self.serialize_params(&item.params)
    }

    fn serialize_params(&mut self, params: &Parameters) -> Result<(), Error> {
        for p in params {
            self.buf.push(';');
            self.serialize_key(&p.key)?;

            if p.value.is_true() {
                continue;
            }

            self.buf.push('=');
            self.serialize_bare_item(&p.value)?;
        }

        Ok(())
    }

    fn serialize_key(&mut self, key: &str) -> Result<(), Error> {
        if !chars::is_valid_key(key) {
            return Err(Error::InvalidKey(key.to_owned()));
        }

        self.buf.push_str(key);

        Ok(())
    }

    fn serialize_bare_item(&mut self, v: &Value) -> Result<(), Error> {
        match v {
            Value::Integer(n) => self.serialize_integer(*n),
            Value::Decimal(d) => self.serialize_decimal(*d),
            Value::String(s) => self.serialize_string(s),
            Value::Token(t) => self.serialize_token(t),
            Value::ByteSeq(b) => {
                self.buf.push(':');
                STANDARD.encode_string(b, &mut self.buf);
                self.buf.push(':');
                Ok(())
            }
            Value::Bool(b) => {
                self.buf.push_str(if *b { "?1" } else { "?0" });
                Ok(())
            }
            Value::Date(n) => {
                self.buf.push('@');
                self.serialize_integer(*n)
            }
            Value::DispString(s) => {
                self.serialize_dispstring(s);
                Ok(())
            }
            Value::InnerList(_) => Err(Error::UnsupportedValue(
                "inner list is not allowed as a bare item",
            )),
        }
    }

    fn serialize_integer(&mut self, n: i64) -> Result<(), Error> {
        if !(MIN_INTEGER..=MAX_INTEGER).contains(&n) {
            return Err(Error::IntegerOutOfRange(n));
        }

        self.buf.push_str(&n.to_string());

        Ok(())
    }

    /// Rounds to the nearest thousandth, ties to even, and drops
    /// trailing zeros of the fraction while keeping at least one digit.
    fn serialize_decimal(&mut self, d: f64) -> Result<(), Error> {
        if !d.is_finite() {
            return Err(Error::DecimalNotFinite(d));
        }

        if !(MIN_DECIMAL..=MAX_DECIMAL).contains(&d) {
            return Err(Error::DecimalOutOfRange(d));
        }

        let mut n = (d * 1000.0).round_ties_even() as i64;

        if n < 0 {
            self.buf.push('-');
            n = -n;
        }

        self.buf.push_str(&(n / 1000).to_string());
        self.buf.push('.');

        let mut frac = n % 1000;

        loop {
            self.buf.push(char::from(b'0' + (frac / 100) as u8));
            frac = frac % 100 * 10;

            if frac == 0 {
                return Ok(());
            }
        }
    }

    fn serialize_string(&mut self, s: &str) -> Result<(), Error> {
        if !chars::is_valid_string(s) {
            return Err(Error::InvalidString(s.to_owned()));
        }

        self.buf.push('"');

        for c in s.chars() {
            if c == '"' || c == '\\' {
                self.buf.push('\\');
            }

            self.buf.push(c);
        }

        self.buf.push('"');

        Ok(())
    }

    fn serialize_token(&mut self, t: &Token) -> Result<(), Error> {
        if !t.is_valid() {
            return Err(Error::InvalidToken(t.as_str().to_owned()));
        }

        self.buf.push_str(t.as_str());

        Ok(())
    }

    /// `%` `"` and bytes outside printable ASCII are percent-encoded in
    /// lowercase hex.
    fn serialize_dispstring(&mut self, s: &str) {
        self.buf.push_str("%\"");

        for &c in s.as_bytes() {
            match c {
                b'%' | b'"' | 0x00..=0x1f | 0x7f..=0xff => {
                    self.buf.push('%');
                    self.buf.push(char::from(chars::HEX_DIGITS[usize::from(c >> 4)]));
                    self.buf.push(char::from(chars::HEX_DIGITS[usize::from(c & 0xf)]));
                }
                _ => self.buf.push(char::from(c)),
            }
        }

        self.buf.push('"');
    }
}
