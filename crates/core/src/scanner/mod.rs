//! Forward-moving cursor over an immutable byte buffer.
//!
//! A [`Scanner`] never copies: every token it returns is a sub-slice of the
//! buffer it was built from. Callers drive it through the grammar of the line
//! they are decoding and re-wrap extracted tokens (a request URI, a header
//! value) in a fresh scanner for nested parsing.
//!
//! ```
//! use rtsp_scan::Scanner;
//!
//! let mut s = Scanner::from("PLAY rtsp://cam/live RTSP/1.0\r\nCSeq: 4\r\n");
//! assert_eq!(s.consume_word(), b"PLAY");
//! s.consume_whitespace();
//! assert_eq!(s.consume_until_whitespace(), b"rtsp://cam/live");
//! s.consume_whitespace();
//! assert_eq!(s.consume_until_eol(), b"RTSP/1.0");
//! assert!(s.expect_eol());
//! assert_eq!(s.line_number(), 2);
//! ```

mod numeric;

use crate::mask::{self, Mask};

/// Cursor bounds for a non-empty buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    position: usize,
    limit: usize,
}

/// Mask-driven byte scanner.
///
/// A scanner over an empty buffer has no cursor at all and is permanently
/// exhausted. Otherwise it is *active* until `position` reaches `limit`.
/// Consuming from an exhausted scanner is a no-op that yields an empty slice.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    buffer: &'a [u8],
    span: Option<Span>,
    line_number: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        let span = (!buffer.is_empty()).then_some(Span {
            position: 0,
            limit: buffer.len(),
        });
        Scanner {
            buffer,
            span,
            line_number: 1,
        }
    }

    /// The whole underlying buffer, consumed or not.
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Returns `true` once there is nothing left to consume.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has moved past its limit, which means the
    /// scanner's own bookkeeping is broken.
    pub fn is_exhausted(&self) -> bool {
        match self.span {
            None => true,
            Some(span) => {
                assert!(
                    span.position <= span.limit,
                    "scanner position {} is past limit {}",
                    span.position,
                    span.limit
                );
                span.position == span.limit
            }
        }
    }

    /// Current byte without advancing, or `0` when exhausted.
    #[inline]
    pub fn peek(&self) -> u8 {
        match self.span {
            Some(span) if span.position < span.limit => self.buffer[span.position],
            _ => 0,
        }
    }

    /// Index of the next unconsumed byte; `None` for a scanner over an empty
    /// buffer.
    pub fn position(&self) -> Option<usize> {
        self.span.map(|span| span.position)
    }

    /// 1-based line number of the cursor.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The unconsumed tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        match self.span {
            Some(span) => &self.buffer[span.position..span.limit],
            None => &[],
        }
    }

    /// Number of bytes consumed so far.
    pub fn parsed_len(&self) -> usize {
        self.position().unwrap_or(0)
    }

    /// Length of the whole buffer.
    pub fn total_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes left before the limit.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is past its limit.
    pub fn remaining_len(&self) -> usize {
        match self.span {
            None => 0,
            Some(span) => span.limit.checked_sub(span.position).unwrap_or_else(|| {
                panic!(
                    "scanner limit {} is before position {}",
                    span.limit, span.position
                )
            }),
        }
    }

    /// Consumes bytes until one that `mask` marks as a stop byte, or the end
    /// of the buffer. The stop byte itself is left in place.
    pub fn consume_until(&mut self, mask: &Mask) -> &'a [u8] {
        self.consume_while_byte(|b| !mask.stops_at(b))
    }

    /// Consumes bytes up to, but not including, the first `target`.
    pub fn consume_until_byte(&mut self, target: u8) -> &'a [u8] {
        self.consume_while_byte(|b| b != target)
    }

    /// `[A-Za-z0-9_]*`
    pub fn consume_word(&mut self) -> &'a [u8] {
        self.consume_until(&mask::NON_WORD)
    }

    /// Everything up to the next word byte.
    pub fn consume_non_word(&mut self) -> &'a [u8] {
        self.consume_until(&mask::WORD)
    }

    /// Skips a whitespace run (line terminators included) and returns it.
    pub fn consume_whitespace(&mut self) -> &'a [u8] {
        self.consume_until(&mask::WHITESPACE)
    }

    pub fn consume_until_whitespace(&mut self) -> &'a [u8] {
        self.consume_until(&mask::EOL_WHITESPACE)
    }

    pub fn consume_until_whitespace_or_query(&mut self) -> &'a [u8] {
        self.consume_until(&mask::EOL_WHITESPACE_QUERY)
    }

    pub fn consume_until_digit(&mut self) -> &'a [u8] {
        self.consume_until(&mask::DIGIT)
    }

    /// Rest of the current line, terminator excluded.
    pub fn consume_until_eol(&mut self) -> &'a [u8] {
        self.consume_until(&mask::EOL)
    }

    /// A URI up to its query string or the surrounding whitespace.
    pub fn consume_url(&mut self) -> &'a [u8] {
        self.consume_until(&mask::URL_STOP)
    }

    /// Consumes the next `length` bytes, or fewer if the buffer runs out.
    pub fn consume_length(&mut self, length: usize) -> &'a [u8] {
        let available = self.remaining_len();
        if length > available {
            tracing::trace!(requested = length, available, "clamping fixed-length read");
        }
        let mut left = length.min(available);
        self.consume_while_byte(|_| {
            let more = left > 0;
            left = left.saturating_sub(1);
            more
        })
    }

    /// Moves the cursor back by up to `count` bytes, never before the start
    /// of the buffer. Line breaks that are re-crossed are taken off the line
    /// count. Returns how many bytes the cursor actually moved.
    pub fn back_up(&mut self, count: usize) -> usize {
        let Some(span) = self.span.as_mut() else {
            return 0;
        };
        let moved = count.min(span.position);
        if moved < count {
            tracing::trace!(requested = count, moved, "clamping rewind at buffer start");
        }
        let from = span.position - moved;
        let crossed = (from..span.position)
            .filter(|&index| is_line_break(self.buffer, index, span.limit))
            .count();
        span.position = from;
        self.line_number = self.line_number.saturating_sub(crossed).max(1);
        moved
    }

    /// Consumes `byte` if it is next. Leaves the cursor alone otherwise.
    pub fn expect(&mut self, byte: u8) -> bool {
        if self.is_exhausted() || self.peek() != byte {
            return false;
        }
        self.advance();
        true
    }

    /// Consumes one logical line terminator: `\r\n`, `\r` or `\n`.
    pub fn expect_eol(&mut self) -> bool {
        !self.consume_eol().is_empty()
    }

    /// Like [`expect_eol`](Self::expect_eol) but returns the terminator
    /// bytes, empty when the cursor is not at a line end.
    pub fn consume_eol(&mut self) -> &'a [u8] {
        let start = self.parsed_len();
        match self.peek() {
            b'\n' => self.advance(),
            b'\r' => {
                self.advance();
                if self.peek() == b'\n' {
                    self.advance();
                }
            }
            _ => return &[],
        }
        &self.buffer[start..self.parsed_len()]
    }

    /// Consumes through `stop`. The returned token excludes `stop`; the flag
    /// is `false` when `stop` never appeared, in which case the token runs
    /// to the end of the buffer.
    pub fn get_through(&mut self, stop: u8) -> (&'a [u8], bool) {
        let token = self.consume_until_byte(stop);
        let found = self.expect(stop);
        (token, found)
    }

    /// Consumes the rest of the line and its terminator. The flag is `false`
    /// when the buffer ended without one.
    pub fn get_through_eol(&mut self) -> (&'a [u8], bool) {
        let token = self.consume_until_eol();
        let found = self.expect_eol();
        (token, found)
    }

    fn consume_while_byte(&mut self, mut keep: impl FnMut(u8) -> bool) -> &'a [u8] {
        if self.is_exhausted() {
            return &[];
        }
        let start = self.parsed_len();
        while !self.is_exhausted() && keep(self.peek()) {
            self.advance();
        }
        &self.buffer[start..self.parsed_len()]
    }

    /// Steps over the current byte, counting a line when it ends one.
    fn advance(&mut self) {
        let Some(span) = self.span.as_mut() else {
            return;
        };
        if span.position >= span.limit {
            return;
        }
        if is_line_break(self.buffer, span.position, span.limit) {
            self.line_number += 1;
        }
        span.position += 1;
    }
}

impl<'a> From<&'a [u8]> for Scanner<'a> {
    fn from(buffer: &'a [u8]) -> Self {
        Scanner::new(buffer)
    }
}

impl<'a> From<&'a str> for Scanner<'a> {
    fn from(text: &'a str) -> Self {
        Scanner::new(text.as_bytes())
    }
}

/// `\n`, or a `\r` that is not the first half of `\r\n`.
fn is_line_break(buffer: &[u8], index: usize, limit: usize) -> bool {
    match buffer[index] {
        b'\n' => true,
        b'\r' => index + 1 >= limit || buffer[index + 1] != b'\n',
        _ => false,
    }
}

/// Drops a leading `"` or `'` and, independently, a trailing one.
///
/// Inputs shorter than two bytes come back unchanged. The quotes need not
/// match each other.
///
/// ```
/// use rtsp_scan::strip_quotes;
///
/// assert_eq!(strip_quotes(b"\"abc\""), b"abc");
/// assert_eq!(strip_quotes(b"'lonequote"), b"lonequote");
/// assert_eq!(strip_quotes(b"x"), b"x");
/// ```
pub fn strip_quotes(bytes: &[u8]) -> &[u8] {
    if bytes.len() < 2 {
        return bytes;
    }
    let is_quote = |b: &u8| matches!(b, b'"' | b'\'');
    let mut inner = bytes;
    if inner.first().is_some_and(is_quote) {
        inner = &inner[1..];
    }
    if inner.last().is_some_and(is_quote) {
        inner = &inner[..inner.len() - 1];
    }
    inner
}
