//! Line and token scanning over an immutable byte buffer.
//!
//! [`Scanner`] walks the whole buffer one line at a time and never moves
//! backwards. Token parsing happens on a [`LineCursor`], which is `Copy`:
//! keeping a copy of it is how a decoder rewinds to retry part of a line.

use std::borrow::Cow;

use thiserror::Error;

/// Why a token could not be read from a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unexpected end of line")]
    EndOfLine,

    #[error("token longer than {max} bytes")]
    TokenTooLong { max: usize },

    #[error("expected an unsigned integer, found '{0}'")]
    InvalidUInt(String),

    #[error("unsigned integer '{0}' does not fit in 32 bits")]
    UIntOverflow(String),

    #[error("expected a float, found '{0}'")]
    InvalidFloat(String),
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_eol(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Forward-only cursor over a whole PLY buffer.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
    line_number: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line_number: 0,
        }
    }

    /// Byte offset of the next unread line.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Advances past spaces and tabs, stopping at line terminators.
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.buf.len() && is_blank(self.buf[self.pos]) {
            self.pos += 1;
        }
    }

    /// Returns `(line_end, next_line_start)` for the line at the cursor.
    ///
    /// `line_end` excludes the terminator (`\n`, `\r\n` or `\r`) and
    /// `next_line_start` points past it. Without a terminator both are the
    /// buffer length.
    pub fn line_bounds(&self) -> (usize, usize) {
        let rest = &self.buf[self.pos.min(self.buf.len())..];
        match rest.iter().position(|&b| is_eol(b)) {
            Some(offset) => {
                let end = self.pos + offset;
                let next = if self.buf[end] == b'\r' && self.buf.get(end + 1) == Some(&b'\n') {
                    end + 2
                } else {
                    end + 1
                };
                (end, next)
            }
            None => (self.buf.len(), self.buf.len()),
        }
    }

    /// Hands out the next line, trimmed of surrounding spaces and tabs.
    ///
    /// Returns `None` once the buffer is exhausted.
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if self.is_exhausted() {
            return None;
        }

        self.skip_whitespace();
        let start = self.pos;
        let (end, next) = self.line_bounds();
        let mut text = &self.buf[start..end];
        while let [rest @ .., last] = text {
            if !is_blank(*last) {
                break;
            }
            text = rest;
        }

        self.pos = next;
        self.line_number += 1;
        Some(Line {
            number: self.line_number,
            text,
        })
    }
}

/// One line of input without its terminator or surrounding blanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the buffer.
    pub number: usize,
    pub text: &'a [u8],
}

impl<'a> Line<'a> {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> LineCursor<'a> {
        LineCursor::new(self.text)
    }

    pub fn to_text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.text)
    }
}

/// Token cursor within a single line.
///
/// Every `parse_*` method either consumes one token plus the blanks after it
/// and returns `Ok`, or returns `Err` and leaves the cursor untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        let mut cursor = Self { line, pos: 0 };
        cursor.skip_whitespace();
        cursor
    }

    pub fn skip_whitespace(&mut self) {
        while self.pos < self.line.len() && is_blank(self.line[self.pos]) {
            self.pos += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// The unread remainder of the line.
    pub fn rest(&self) -> &'a [u8] {
        &self.line[self.pos..]
    }

    fn at_boundary(&self, end: usize) -> bool {
        end >= self.line.len() || is_blank(self.line[end])
    }

    fn raw_token(&self) -> &'a [u8] {
        let rest = self.rest();
        let len = rest.iter().position(|&b| is_blank(b)).unwrap_or(rest.len());
        &rest[..len]
    }

    fn commit(&mut self, len: usize) {
        self.pos += len;
        self.skip_whitespace();
    }

    /// Reads a run of non-blank bytes of at most `max_len - 1` bytes.
    pub fn parse_token(&mut self, max_len: usize) -> Result<&'a [u8], ScanError> {
        let token = self.raw_token();
        if token.is_empty() {
            return Err(ScanError::EndOfLine);
        }
        let max = max_len.saturating_sub(1);
        if token.len() > max {
            return Err(ScanError::TokenTooLong { max });
        }
        self.commit(token.len());
        Ok(token)
    }

    pub fn parse_uint(&mut self) -> Result<u32, ScanError> {
        let rest = self.rest();
        if rest.is_empty() {
            return Err(ScanError::EndOfLine);
        }

        let digits = count_digits(rest);
        if digits == 0 || !self.at_boundary(self.pos + digits) {
            let token = String::from_utf8_lossy(self.raw_token()).into_owned();
            return Err(ScanError::InvalidUInt(token));
        }

        let text = String::from_utf8_lossy(&rest[..digits]);
        let value = text
            .parse::<u32>()
            .map_err(|_| ScanError::UIntOverflow(text.into_owned()))?;

        self.commit(digits);
        Ok(value)
    }

    /// Reads `[sign] digits [. digits] [(e|E) [sign] digits]`.
    ///
    /// At least one mantissa digit is required. `inf`, `nan` and literals
    /// that overflow `f32` are rejected.
    pub fn parse_float(&mut self) -> Result<f32, ScanError> {
        let rest = self.rest();
        if rest.is_empty() {
            return Err(ScanError::EndOfLine);
        }
        let invalid =
            || ScanError::InvalidFloat(String::from_utf8_lossy(self.raw_token()).into_owned());

        let mut len = 0;
        if matches!(rest.first(), Some(b'+' | b'-')) {
            len += 1;
        }
        let int_digits = count_digits(&rest[len..]);
        len += int_digits;
        let mut frac_digits = 0;
        if rest.get(len) == Some(&b'.') {
            frac_digits = count_digits(&rest[len + 1..]);
            len += 1 + frac_digits;
        }
        if int_digits + frac_digits == 0 {
            return Err(invalid());
        }
        if matches!(rest.get(len), Some(b'e' | b'E')) {
            let mut exp = len + 1;
            if matches!(rest.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = count_digits(&rest[exp..]);
            if exp_digits > 0 {
                len = exp + exp_digits;
            }
        }
        if !self.at_boundary(self.pos + len) {
            return Err(invalid());
        }

        let value = std::str::from_utf8(&rest[..len])
            .ok()
            .and_then(|text| text.parse::<f32>().ok())
            .filter(|value| value.is_finite())
            .ok_or_else(invalid)?;

        self.commit(len);
        Ok(value)
    }
}
