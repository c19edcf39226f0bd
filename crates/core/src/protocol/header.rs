use std::borrow::Cow;

use crate::error::{ParseErrorKind, Result, ScanError};
use crate::mask::Mask;
use crate::protocol::range::NptRange;
use crate::protocol::{ParseConfig, decimal, text};
use crate::scanner::Scanner;

/// Header name runs up to the colon, and never past the end of its line.
const HEADER_NAME: Mask = Mask::from_stop_bytes(b"\r\n:");

/// One `Name: value` header line.
///
/// The value borrows from the message unless continuation lines were folded
/// into it, in which case it keeps their terminators and leading whitespace
/// as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
    /// Line the header starts on.
    pub line: usize,
}

/// Header block in received order. Lookups are case-insensitive per
/// RFC 2326 §4.2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers<'a> {
    entries: Vec<Header<'a>>,
}

impl<'a> Headers<'a> {
    /// Reads header lines up to and including the blank line that ends the
    /// block.
    ///
    /// ```
    /// use rtsp_scan::{ParseConfig, Scanner};
    /// use rtsp_scan::protocol::Headers;
    ///
    /// let mut s = Scanner::from("CSeq: 3\r\nSession: E1155C20\r\n\r\nbody");
    /// let headers = Headers::parse(&mut s, &ParseConfig::default()).unwrap();
    /// assert_eq!(headers.cseq(), Some("3"));
    /// assert_eq!(s.rest(), b"body");
    /// ```
    pub fn parse(scanner: &mut Scanner<'a>, config: &ParseConfig) -> Result<Self> {
        let mut entries = Vec::new();
        loop {
            if scanner.is_exhausted() {
                if config.require_terminator {
                    return Err(ScanError::parse(
                        ParseErrorKind::MissingTerminator,
                        scanner.line_number(),
                    ));
                }
                break;
            }
            if scanner.expect_eol() {
                break;
            }
            if entries.len() == config.max_headers {
                return Err(ScanError::parse(
                    ParseErrorKind::TooManyHeaders(config.max_headers),
                    scanner.line_number(),
                ));
            }
            entries.push(parse_line(scanner, config)?);
        }
        Ok(Headers { entries })
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|header| header.value.as_ref())
    }

    fn find(&self, name: &str) -> Option<&Header<'a>> {
        self.entries
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
    }

    /// Every value for `name`, in received order.
    pub fn get_all<'h>(&'h self, name: &'h str) -> impl Iterator<Item = &'h str> + 'h {
        self.entries
            .iter()
            .filter(move |header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_ref())
    }

    /// The CSeq header, which pairs a request with its response
    /// (RFC 2326 §12.17).
    pub fn cseq(&self) -> Option<&str> {
        self.get("CSeq")
    }

    /// Session identifier without its `;timeout=` parameter (RFC 2326 §12.37).
    pub fn session(&self) -> Option<&str> {
        let value = self.get("Session")?;
        let id = Scanner::from(value).consume_until_byte(b';').len();
        Some(value[..id].trim_end())
    }

    /// `Content-Length` when it is a plain decimal that fits a `usize`.
    pub fn content_length(&self) -> Option<usize> {
        let mut scanner = Scanner::from(self.get("Content-Length")?);
        let length = decimal(&mut scanner)?;
        scanner.is_exhausted().then_some(length)
    }

    /// Parses the `Range` header, if present. Errors carry the header's line.
    pub fn range(&self) -> Option<Result<NptRange>> {
        let header = self.find("Range")?;
        Some(NptRange::parse(&header.value).map_err(|e| e.at_line(header.line)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'h, 'a> IntoIterator for &'h Headers<'a> {
    type Item = &'h Header<'a>;
    type IntoIter = std::slice::Iter<'h, Header<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn is_continuation(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

fn parse_line<'a>(scanner: &mut Scanner<'a>, config: &ParseConfig) -> Result<Header<'a>> {
    let line = scanner.line_number();
    let name = scanner.consume_until(&HEADER_NAME).trim_ascii();
    if !scanner.expect(b':') || name.is_empty() {
        return Err(ScanError::parse(ParseErrorKind::InvalidHeader, line));
    }
    let name = text(name, scanner)?;

    let first = scanner.consume_until_eol();
    let mut eol = scanner.consume_eol();
    if !is_continuation(scanner.peek()) {
        let value = text(first.trim_ascii(), scanner)?;
        return Ok(Header {
            name,
            value: Cow::Borrowed(value),
            line,
        });
    }
    if !config.fold_continuations {
        return Err(ScanError::parse(
            ParseErrorKind::FoldedHeader,
            scanner.line_number(),
        ));
    }

    let mut folded = first.to_vec();
    while is_continuation(scanner.peek()) {
        folded.extend_from_slice(eol);
        folded.extend_from_slice(scanner.consume_until_eol());
        eol = scanner.consume_eol();
    }
    tracing::trace!(header = name, line, "folded header continuation");
    let value = text(folded.trim_ascii(), scanner)?.to_owned();
    Ok(Header {
        name,
        value: Cow::Owned(value),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Headers<'_>> {
        Headers::parse(&mut Scanner::from(raw), &ParseConfig::default())
    }

    #[test]
    fn parse_simple_block() {
        let headers = parse("CSeq: 2\r\nAccept:application/sdp\r\n\r\n").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.cseq(), Some("2"));
        assert_eq!(headers.get("accept"), Some("application/sdp"));
        assert_eq!(headers.get("Missing"), None);
    }

    #[test]
    fn header_lines_are_numbered() {
        let headers = parse("CSeq: 2\nAccept: a\r\n\r\n").unwrap();
        let lines: Vec<usize> = headers.iter().map(|h| h.line).collect();
        assert_eq!(lines, [1, 2]);
    }

    #[test]
    fn folded_value_keeps_continuation() {
        let headers = parse("X-Note: first\r\n  second\r\n\tthird \r\nCSeq: 9\r\n\r\n").unwrap();
        let note = headers.iter().next().unwrap();
        assert_eq!(note.name, "X-Note");
        assert_eq!(note.value, "first\r\n  second\r\n\tthird");
        assert!(matches!(note.value, Cow::Owned(_)));
        assert_eq!(headers.cseq(), Some("9"));
    }

    #[test]
    fn folding_can_be_disabled() {
        let config = ParseConfig {
            fold_continuations: false,
            ..ParseConfig::default()
        };
        let err = Headers::parse(&mut Scanner::from("A: b\r\n c\r\n\r\n"), &config).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Parse {
                kind: ParseErrorKind::FoldedHeader,
                line: 2
            }
        ));
    }

    #[test]
    fn missing_colon_is_invalid() {
        let err = parse("CSeq: 1\r\nbogus line\r\n\r\n").unwrap_err();
        assert_eq!(err.kind(), Some(&ParseErrorKind::InvalidHeader));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_colon_does_not_reach_next_line() {
        let err = parse("CSeq: 1\r\nbogus line\r\nAccept: x\r\n\r\n").unwrap_err();
        assert!(matches!(
            err,
            ScanError::Parse {
                kind: ParseErrorKind::InvalidHeader,
                line: 2
            }
        ));

        let err = parse("CSeq: 1\r\nno colon at all").unwrap_err();
        assert_eq!(err.kind(), Some(&ParseErrorKind::InvalidHeader));
    }

    #[test]
    fn header_limit_is_enforced() {
        let config = ParseConfig {
            max_headers: 1,
            ..ParseConfig::default()
        };
        let err = Headers::parse(&mut Scanner::from("A: 1\r\nB: 2\r\n\r\n"), &config).unwrap_err();
        assert_eq!(err.kind(), Some(&ParseErrorKind::TooManyHeaders(1)));
    }

    #[test]
    fn unterminated_block() {
        let headers = parse("CSeq: 5\r\nSession: E1155C20").unwrap();
        assert_eq!(headers.session(), Some("E1155C20"));

        let config = ParseConfig {
            require_terminator: true,
            ..ParseConfig::default()
        };
        let err = Headers::parse(&mut Scanner::from("CSeq: 5\r\n"), &config).unwrap_err();
        assert_eq!(err.kind(), Some(&ParseErrorKind::MissingTerminator));
    }

    #[test]
    fn typed_lookups() {
        let headers = parse(
            "Content-Length: 339\r\nSession: 12345678 ; timeout=60\r\nVia: a\r\nvia: b\r\n\r\n",
        )
        .unwrap();
        assert_eq!(headers.content_length(), Some(339));
        assert_eq!(headers.session(), Some("12345678"));
        assert_eq!(headers.get_all("VIA").collect::<Vec<_>>(), ["a", "b"]);

        let headers = parse("Content-Length: 12abc\r\n\r\n").unwrap();
        assert_eq!(headers.content_length(), None);
    }

    #[test]
    fn oversized_content_length_is_rejected() {
        let headers = parse("Content-Length: 18446744073709551621\r\n\r\n").unwrap();
        assert_eq!(headers.content_length(), None);

        let headers = parse("Content-Length: 000339\r\n\r\n").unwrap();
        assert_eq!(headers.content_length(), Some(339));
    }

    #[test]
    fn range_error_reports_header_line() {
        let headers = parse("CSeq: 4\r\nSession: 1\r\nRange: clock=x-\r\n\r\n").unwrap();
        let err = headers.range().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ScanError::Parse {
                kind: ParseErrorKind::InvalidRange,
                line: 3
            }
        ));
    }

    #[test]
    fn empty_block() {
        let mut s = Scanner::from("\r\nrest");
        let headers = Headers::parse(&mut s, &ParseConfig::default()).unwrap();
        assert!(headers.is_empty());
        assert_eq!(s.rest(), b"rest");
    }
}
