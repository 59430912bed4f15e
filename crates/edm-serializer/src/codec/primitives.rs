//! Cursor over canonical text.
//!
//! All grammars in the canonical form are ASCII, so the scanner works on
//! bytes and reports failures as [`ValueError::Malformed`] tagged with the
//! EDM kind being decoded.

use crate::error::ValueError;
use crate::model::EdmType;

pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    edm_type: EdmType,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str, edm_type: EdmType) -> Self {
        Self { bytes: text.as_bytes(), pos: 0, edm_type }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn error(&self, reason: &'static str) -> ValueError {
        ValueError::Malformed { edm_type: self.edm_type, reason }
    }

    /// Consumes `byte` if it is next.
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), ValueError> {
        if self.eat(byte) { Ok(()) } else { Err(self.error(reason)) }
    }

    pub fn read_byte(&mut self, reason: &'static str) -> Result<u8, ValueError> {
        let byte = self.peek().ok_or_else(|| self.error(reason))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly `count` decimal digits.
    pub fn read_fixed_digits(
        &mut self,
        count: usize,
        reason: &'static str,
    ) -> Result<u32, ValueError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    value = value * 10 + u32::from(c - b'0');
                    self.pos += 1;
                }
                _ => return Err(self.error(reason)),
            }
        }
        Ok(value)
    }

    /// Reads a run of at most `max` digits, returning the digit text.
    ///
    /// Fails when the run is empty or longer than `max`.
    pub fn read_digit_run(
        &mut self,
        max: usize,
        reason: &'static str,
    ) -> Result<&'a str, ValueError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let len = self.pos - start;
        if len == 0 || len > max {
            return Err(self.error(reason));
        }
        self.slice(start, self.pos)
    }

    /// Skips a run of digits, returning how many were consumed.
    pub fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Fails unless the whole input was consumed.
    pub fn finish(&self) -> Result<(), ValueError> {
        if self.is_at_end() { Ok(()) } else { Err(self.error("trailing characters")) }
    }

    fn slice(&self, start: usize, end: usize) -> Result<&'a str, ValueError> {
        std::str::from_utf8(&self.bytes[start..end]).map_err(|_| self.error("invalid UTF-8"))
    }
}

/// Strips one pair of surrounding double quotes.
pub fn unquote(text: &str) -> Option<&str> {
    text.strip_prefix('"')?.strip_suffix('"')
}
