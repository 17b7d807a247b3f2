//! Character classes of the Structured Field Values grammar.

/// First character of a Token: `ALPHA / "*"`.
pub(crate) const fn is_token_start(c: u8) -> bool {
    matches!(c, b'*' | b'A'..=b'Z' | b'a'..=b'z')
}

/// Remaining characters of a Token: `tchar / ":" / "/"`.
pub(crate) const fn is_token_char(c: u8) -> bool {
    matches!(
        c,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'/'
            | b'0'..=b'9'
            | b':'
            | b'A'..=b'Z'
            | b'^'
            | b'_'
            | b'`'
            | b'a'..=b'z'
            | b'|'
            | b'~'
    )
}

/// First character of a Key: `lcalpha / "*"`.
pub(crate) const fn is_key_start(c: u8) -> bool {
    matches!(c, b'*' | b'a'..=b'z')
}

/// Remaining characters of a Key.
pub(crate) const fn is_key_char(c: u8) -> bool {
    matches!(c, b'_' | b'-' | b'.' | b'*' | b'0'..=b'9' | b'a'..=b'z')
}

/// Characters allowed inside a Byte Sequence, padding included.
pub(crate) const fn is_base64_char(c: u8) -> bool {
    matches!(c, b'+' | b'/' | b'=' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z')
}

/// Printable ASCII, the only bytes allowed in Strings.
pub(crate) const fn is_vchar_or_sp(c: u8) -> bool {
    matches!(c, 0x20..=0x7e)
}

/// Display String escapes use lowercase hex only.
pub(crate) const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

pub(crate) const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

pub(crate) fn is_valid_token(s: &str) -> bool {
    match s.as_bytes().split_first() {
        Some((&first, rest)) => is_token_start(first) && rest.iter().all(|&c| is_token_char(c)),
        None => false,
    }
}

pub(crate) fn is_valid_key(s: &str) -> bool {
    match s.as_bytes().split_first() {
        Some((&first, rest)) => is_key_start(first) && rest.iter().all(|&c| is_key_char(c)),
        None => false,
    }
}

/// Reports whether `s` can be serialized as a String: printable ASCII
/// only, SP included.
///
/// ```
/// assert!(sfcodec::is_valid_string("hello \"world\""));
/// assert!(!sfcodec::is_valid_string("f\u{fc}r"));
/// ```
pub fn is_valid_string(s: &str) -> bool {
    s.bytes().all(is_vchar_or_sp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_grammar() {
        assert!(is_valid_token("foo"));
        assert!(is_valid_token("*"));
        assert!(is_valid_token("FooBar"));
        assert!(is_valid_token("a_b-c.d3:f%00/*"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("1foo"));
        assert!(!is_valid_token("foo bar"));
        assert!(!is_valid_token("foo\"bar"));
        assert!(!is_valid_token("f\u{e9}e"));
    }

    #[test]
    fn key_grammar() {
        assert!(is_valid_key("a"));
        assert!(is_valid_key("*"));
        assert!(is_valid_key("a_b-c.d*9"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("A"));
        assert!(!is_valid_key("_a"));
        assert!(!is_valid_key("aB"));
        assert!(!is_valid_key("a:b"));
    }

    #[test]
    fn string_chars() {
        assert!(is_valid_string(""));
        assert!(is_valid_string(" ~"));
        assert!(!is_valid_string("\t"));
        assert!(!is_valid_string("\x7f"));
        assert!(!is_valid_string("\u{fc}"));
    }

    #[test]
    fn hex() {
        for (i, &c) in HEX_DIGITS.iter().enumerate() {
            assert_eq!(Some(i as u8), hex_value(c));
        }
        assert_eq!(None, hex_value(b'A'));
        assert_eq!(None, hex_value(b'g'));
    }
}
