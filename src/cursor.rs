//! Virtual character stream over repeated field lines.

/// Inserted between two consecutive non-empty fields.
const SEPARATOR: &[u8] = b", ";

/// Cursor presents `fields` as if they were joined with `", "`
/// without building the joined copy.
///
/// Invariant: while `line < fields.len()` and no separator is pending,
/// `col` is a valid index into `fields[line]`.  Empty fields are
/// skipped entirely.
pub(crate) struct Cursor<'a, S> {
    fields: &'a [S],
    line: usize,
    col: usize,
    sep: Option<usize>,
    pos: usize,
}

impl<'a, S: AsRef<[u8]>> Cursor<'a, S> {
    pub(crate) fn new(fields: &'a [S]) -> Self {
        let mut c = Cursor {
            fields,
            line: 0,
            col: 0,
            sep: None,
            pos: 0,
        };
        c.skip_empty_fields();
        c
    }

    /// Returns the current byte, or `None` at the end of input.
    pub(crate) fn peek(&self) -> Option<u8> {
        if let Some(i) = self.sep {
            return Some(SEPARATOR[i]);
        }

        self.fields
            .get(self.line)
            .and_then(|f| f.as_ref().get(self.col).copied())
    }

    pub(crate) fn eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Position of the current byte in the virtual stream.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Moves past the current byte.  No-op at the end of input.
    pub(crate) fn advance(&mut self) {
        if let Some(i) = self.sep {
            self.pos += 1;
            self.sep = (i + 1 < SEPARATOR.len()).then_some(i + 1);
            return;
        }

        let Some(field) = self.fields.get(self.line) else {
            return;
        };

        self.pos += 1;
        self.col += 1;

        if self.col < field.as_ref().len() {
            return;
        }

        self.col = 0;
        self.line += 1;
        self.skip_empty_fields();

        if self.line < self.fields.len() {
            self.sep = Some(0);
        }
    }

    /// Consumes SP only.
    pub(crate) fn skip_sp(&mut self) {
        while self.peek() == Some(b' ') {
            self.advance();
        }
    }

    /// Consumes OWS, i.e. SP and HTAB.
    pub(crate) fn skip_ows(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.advance();
        }
    }

    fn skip_empty_fields(&mut self) {
        while self
            .fields
            .get(self.line)
            .is_some_and(|f| f.as_ref().is_empty())
        {
            self.line += 1;
        }
    }
}
