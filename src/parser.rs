use std::collections::HashMap;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::{debug, trace};

use crate::chars;
use crate::cursor::Cursor;
use crate::value::{DictMember, Dictionary, InnerList, Item, List, Parameter, Parameters, Token, Value};
use crate::Error;

/// Standard alphabet, tolerant of missing padding and non-zero pad
/// bits.
const BYTE_SEQ_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parses the fields as a single Item.
///
/// ```
/// let item = sfcodec::decode_item(&[r#"2; foourl="https://foo.example.com/""#]).unwrap();
///
/// assert_eq!(Some(2), item.value.as_integer());
/// assert_eq!(
///     Some("https://foo.example.com/"),
///     item.params.get("foourl").and_then(|v| v.as_str()),
/// );
/// ```
pub fn decode_item<S: AsRef<[u8]>>(fields: &[S]) -> Result<Item, Error> {
    let mut p = Parser::new(fields);

    let item = p
        .parse_field(Parser::parse_item)
        .inspect_err(|err| debug!(%err, "failed to decode item field"))?;

    trace!(params = item.params.len(), "decoded item field");

    Ok(item)
}

/// Parses the fields as a List.  Empty input is an empty List.
///
/// ```
/// let list = sfcodec::decode_list(&["foo", "bar"]).unwrap();
///
/// for item in &list {
///     println!("{}", item.value);
/// }
/// # assert_eq!(2, list.len());
/// ```
pub fn decode_list<S: AsRef<[u8]>>(fields: &[S]) -> Result<List, Error> {
    let mut p = Parser::new(fields);

    let list = p
        .parse_field(Parser::parse_list)
        .inspect_err(|err| debug!(%err, "failed to decode list field"))?;

    trace!(members = list.len(), "decoded list field");

    Ok(list)
}

/// Parses the fields as a Dictionary.  Empty input is an empty
/// Dictionary.
///
/// ```
/// let dict = sfcodec::decode_dictionary(&["u=2, i"]).unwrap();
///
/// assert_eq!(Some(2), dict.get("u").and_then(|m| m.value.as_integer()));
/// assert_eq!(Some(true), dict.get("i").and_then(|m| m.value.as_bool()));
/// ```
pub fn decode_dictionary<S: AsRef<[u8]>>(fields: &[S]) -> Result<Dictionary, Error> {
    let mut p = Parser::new(fields);

    let dict = p
        .parse_field(Parser::parse_dict)
        .inspect_err(|err| debug!(%err, "failed to decode dictionary field"))?;

    trace!(members = dict.len(), "decoded dictionary field");

    Ok(dict)
}

/// Parser is a recursive-descent [RFC
/// 9651](https://datatracker.ietf.org/doc/html/rfc9651) Structured
/// Field Values parser.  Each grammar rule is one method that reads
/// from the shared cursor and fails on the first violation.
pub(crate) struct Parser<'a, S> {
    cur: Cursor<'a, S>,
}

impl<'a, S: AsRef<[u8]>> Parser<'a, S> {
    pub(crate) fn new(fields: &'a [S]) -> Self {
        Parser {
            cur: Cursor::new(fields),
        }
    }

    /// Runs a top-level rule, allowing leading and trailing SP.
    fn parse_field<T>(&mut self, rule: fn(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.cur.skip_sp();

        let v = rule(self)?;

        self.cur.skip_sp();

        if !self.cur.eof() {
            return Err(Error::TrailingCharacters {
                index: self.cur.pos(),
            });
        }

        Ok(v)
    }

    fn parse_list(&mut self) -> Result<List, Error> {
        let mut list = List::new();

        if self.cur.eof() {
            return Ok(list);
        }

        loop {
            list.push(self.parse_item_or_inner_list()?);

            if !self.next_key_or_item()? {
                return Ok(list);
            }
        }
    }

    fn parse_dict(&mut self) -> Result<Dictionary, Error> {
        let mut dict = Dictionary::new();
        let mut seen = HashMap::new();

        if self.cur.eof() {
            return Ok(dict);
        }

        loop {
            let key = self.parse_key()?;

            let item = if self.cur.peek() == Some(b'=') {
                self.cur.advance();
                self.parse_item_or_inner_list()?
            } else {
                Item {
                    value: Value::Bool(true),
                    params: self.parse_params()?,
                }
            };

            let idx = seen.get(&key).copied();
            let idx = dict.put(idx, DictMember { key: key.clone(), item });
            seen.insert(key, idx);

            if !self.next_key_or_item()? {
                return Ok(dict);
            }
        }
    }

    /// Consumes the separator between List or Dictionary members.
    /// Returns false at the end of input.
    fn next_key_or_item(&mut self) -> Result<bool, Error> {
        self.cur.skip_ows();

        match self.cur.peek() {
            None => return Ok(false),
            Some(b',') => self.cur.advance(),
            Some(_) => return Err(self.unexpected()),
        }

        self.cur.skip_ows();

        if self.cur.eof() {
            return Err(Error::TrailingComma);
        }

        Ok(true)
    }

    fn parse_item_or_inner_list(&mut self) -> Result<Item, Error> {
        if self.cur.peek() != Some(b'(') {
            return self.parse_item();
        }

        self.cur.advance();

        let list = self.parse_inner_list()?;
        let params = self.parse_params()?;

        Ok(Item {
            value: Value::InnerList(list),
            params,
        })
    }

    /// Parses Inner List members after the opening `(`, through the
    /// closing `)`.
    fn parse_inner_list(&mut self) -> Result<InnerList, Error> {
        let mut list = InnerList::new();

        loop {
            self.cur.skip_sp();

            if self.cur.peek() == Some(b')') {
                self.cur.advance();
                return Ok(list);
            }

            list.push(self.parse_item()?);

            match self.cur.peek() {
                Some(b' ' | b')') => (),
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_item(&mut self) -> Result<Item, Error> {
        let value = self.parse_bare_item()?;
        let params = self.parse_params()?;

        Ok(Item { value, params })
    }

    fn parse_params(&mut self) -> Result<Parameters, Error> {
        let mut params = Parameters::new();
        let mut seen = HashMap::new();

        while self.cur.peek() == Some(b';') {
            self.cur.advance();
            self.cur.skip_sp();

            let key = self.parse_key()?;

            let value = if self.cur.peek() == Some(b'=') {
                self.cur.advance();
                self.parse_bare_item()?
            } else {
                Value::Bool(true)
            };

            let idx = seen.get(&key).copied();
            let idx = params.put(idx, Parameter { key: key.clone(), value });
            seen.insert(key, idx);
        }

        Ok(params)
    }

    fn parse_key(&mut self) -> Result<String, Error> {
        let mut key = String::new();

        match self.cur.peek() {
            Some(c) if chars::is_key_start(c) => key.push(char::from(c)),
            _ => return Err(self.unexpected()),
        }

        self.cur.advance();

        while let Some(c) = self.cur.peek().filter(|&c| chars::is_key_char(c)) {
            key.push(char::from(c));
            self.cur.advance();
        }

        Ok(key)
    }

    fn parse_bare_item(&mut self) -> Result<Value, Error> {
        match self.cur.peek() {
            Some(b'"') => self.parse_string(),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'@') => self.parse_date(),
            Some(b':') => self.parse_byteseq(),
            Some(b'?') => self.parse_boolean(),
            Some(c) if chars::is_token_start(c) => self.parse_token(),
            Some(b'%') => self.parse_dispstring(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_string(&mut self) -> Result<Value, Error> {
        self.cur.advance();

        let mut s = String::new();

        loop {
            match self.cur.peek() {
                Some(b'\\') => {
                    self.cur.advance();

                    match self.cur.peek() {
                        Some(c @ (b'"' | b'\\')) => s.push(char::from(c)),
                        _ => return Err(self.unexpected()),
                    }
                }
                Some(b'"') => {
                    self.cur.advance();

                    return Ok(Value::String(s));
                }
                Some(c) if chars::is_vchar_or_sp(c) => s.push(char::from(c)),
                _ => return Err(self.unexpected()),
            }

            self.cur.advance();
        }
    }

    fn parse_number(&mut self) -> Result<Value, Error> {
        let neg = self.parse_sign()?;
        let (int, len) = self.parse_digits()?;

        if self.cur.peek() != Some(b'.') {
            return Ok(Value::Integer(if neg { -int } else { int }));
        }

        // decimal

        if len > 12 {
            return Err(Error::DecimalOverflow {
                index: self.cur.pos(),
            });
        }

        self.cur.advance();

        let mut frac: i64 = 0;
        let mut denom: i64 = 1;

        while let Some(c) = self.cur.peek().filter(u8::is_ascii_digit) {
            if denom == 1000 {
                return Err(Error::FractionTooLong {
                    index: self.cur.pos(),
                });
            }

            frac = frac * 10 + i64::from(c - b'0');
            denom *= 10;
            self.cur.advance();
        }

        if denom == 1 {
            return Err(self.unexpected());
        }

        let v = int as f64 + frac as f64 / denom as f64;

        Ok(Value::Decimal(if neg { -v } else { v }))
    }

    fn parse_date(&mut self) -> Result<Value, Error> {
        self.cur.advance();

        let neg = self.parse_sign()?;
        let (v, _) = self.parse_digits()?;

        if self.cur.peek() == Some(b'.') {
            return Err(self.unexpected());
        }

        Ok(Value::Date(if neg { -v } else { v }))
    }

    /// Consumes an optional `-`.
    fn parse_sign(&mut self) -> Result<bool, Error> {
        if self.cur.peek() != Some(b'-') {
            return Ok(false);
        }

        self.cur.advance();

        Ok(true)
    }

    /// Reads 1 to 15 digits and returns the value and the digit count.
    fn parse_digits(&mut self) -> Result<(i64, usize), Error> {
        let mut value: i64 = 0;
        let mut len = 0;

        while let Some(c) = self.cur.peek().filter(u8::is_ascii_digit) {
            len += 1;
            if len > 15 {
                return Err(Error::IntegerOverflow {
                    index: self.cur.pos(),
                });
            }

            value = value * 10 + i64::from(c - b'0');
            self.cur.advance();
        }

        if len == 0 {
            return Err(self.unexpected());
        }

        Ok((value, len))
    }

    fn parse_byteseq(&mut self) -> Result<Value, Error> {
        self.cur.advance();

        let mut b64 = Vec::new();

        loop {
            match self.cur.peek() {
                Some(b':') => break,
                Some(c) if chars::is_base64_char(c) => b64.push(c),
                _ => return Err(self.unexpected()),
            }

            self.cur.advance();
        }

        self.cur.advance();

        while b64.len() % 4 != 0 {
            b64.push(b'=');
        }

        Ok(Value::ByteSeq(BYTE_SEQ_ENGINE.decode(&b64)?))
    }

    fn parse_boolean(&mut self) -> Result<Value, Error> {
        self.cur.advance();

        let b = match self.cur.peek() {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(self.unexpected()),
        };

        self.cur.advance();

        Ok(Value::Bool(b))
    }

    fn parse_token(&mut self) -> Result<Value, Error> {
        let mut s = String::new();

        while let Some(c) = self.cur.peek().filter(|&c| chars::is_token_char(c)) {
            s.push(char::from(c));
            self.cur.advance();
        }

        Ok(Value::Token(Token::from(s)))
    }

    fn parse_dispstring(&mut self) -> Result<Value, Error> {
        self.cur.advance();

        if self.cur.peek() != Some(b'"') {
            return Err(self.unexpected());
        }

        self.cur.advance();

        let mut buf = Vec::new();

        loop {
            let c = match self.cur.peek() {
                Some(c) if chars::is_vchar_or_sp(c) => c,
                _ => return Err(self.unexpected()),
            };

            self.cur.advance();

            match c {
                b'%' => {
                    let hi = self.parse_hex_digit()?;
                    let lo = self.parse_hex_digit()?;

                    buf.push((hi << 4) | lo);
                }
                b'"' => {
                    return String::from_utf8(buf)
                        .map(Value::DispString)
                        .map_err(|_| Error::InvalidUtf8);
                }
                _ => buf.push(c),
            }
        }
    }

    fn parse_hex_digit(&mut self) -> Result<u8, Error> {
        match self.cur.peek().and_then(chars::hex_value) {
            Some(d) => {
                self.cur.advance();
                Ok(d)
            }
            None => Err(self.unexpected()),
        }
    }

    /// Error for the byte at the cursor, or for the end of input.
    fn unexpected(&self) -> Error {
        let index = self.cur.pos();

        match self.cur.peek() {
            Some(byte) => Error::UnexpectedByte { byte, index },
            None => Error::UnexpectedEnd { index },
        }
    }
}
