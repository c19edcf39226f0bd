use std::fmt;

use crate::error::{ParseErrorKind, Result, ScanError};
use crate::protocol::skip_linear_whitespace;
use crate::scanner::Scanner;

/// One end of an NPT range (RFC 2326 §3.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NptTime {
    /// The live edge of the stream.
    Now,
    /// Seconds from the start of the presentation.
    Seconds(f64),
}

impl fmt::Display for NptTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Now => write!(f, "now"),
            Self::Seconds(seconds) => write!(f, "{seconds}"),
        }
    }
}

/// Value of a `Range: npt=start-[end]` header.
///
/// Either end may be omitted (`npt=10-`, `npt=-20`), but not both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NptRange {
    pub start: Option<NptTime>,
    pub end: Option<NptTime>,
}

impl NptRange {
    /// Parses a `Range` header value. Trailing range parameters such as
    /// `;time=...` are ignored. Errors report line 1 of the value;
    /// [`Headers::range`](crate::Headers::range) moves them to the header's line.
    ///
    /// ```
    /// use rtsp_scan::{NptRange, NptTime};
    ///
    /// let range = NptRange::parse("npt=0.000-").unwrap();
    /// assert_eq!(range.start, Some(NptTime::Seconds(0.0)));
    /// assert_eq!(range.end, None);
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || ScanError::parse(ParseErrorKind::InvalidRange, 1);
        let mut scanner = Scanner::from(value);

        skip_linear_whitespace(&mut scanner);
        if !scanner.consume_word().eq_ignore_ascii_case(b"npt") || !scanner.expect(b'=') {
            return Err(invalid());
        }
        skip_linear_whitespace(&mut scanner);

        let start = npt_time(&mut scanner);
        if !scanner.expect(b'-') {
            return Err(invalid());
        }
        let end = npt_time(&mut scanner);
        if start.is_none() && end.is_none() {
            return Err(invalid());
        }

        skip_linear_whitespace(&mut scanner);
        if !scanner.is_exhausted() && scanner.peek() != b';' {
            return Err(invalid());
        }
        Ok(NptRange { start, end })
    }

    /// Length of the range in seconds, when both ends are fixed times.
    pub fn duration(&self) -> Option<f64> {
        match (self.start?, self.end?) {
            (NptTime::Seconds(start), NptTime::Seconds(end)) => Some(end - start),
            _ => None,
        }
    }
}

impl fmt::Display for NptRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npt=")?;
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, "-")?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

fn npt_time(scanner: &mut Scanner<'_>) -> Option<NptTime> {
    match scanner.peek() {
        b'0'..=b'9' => Some(NptTime::Seconds(scanner.consume_npt())),
        b'n' | b'N' => {
            let word = scanner.consume_word();
            if word.eq_ignore_ascii_case(b"now") {
                Some(NptTime::Now)
            } else {
                scanner.back_up(word.len());
                None
            }
        }
        _ => None,
    }
}
