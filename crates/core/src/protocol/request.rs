use crate::error::{ParseErrorKind, Result, ScanError};
use crate::protocol::header::Headers;
use crate::protocol::range::NptRange;
use crate::protocol::uri::RequestUri;
use crate::protocol::{ParseConfig, skip_linear_whitespace, take_body, text};
use crate::scanner::Scanner;

/// A tokenized RTSP request (RFC 2326 §6).
///
/// ```text
/// Method SP Request-URI SP RTSP-Version CRLF
/// *(Header: Value CRLF)
/// CRLF
/// [body]
/// ```
///
/// All fields borrow from the buffer the request was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct RtspRequest<'a> {
    /// RTSP method (OPTIONS, DESCRIBE, SETUP, PLAY, etc.), not validated.
    pub method: &'a str,
    /// Request-URI as received; see [`request_uri`](Self::request_uri).
    pub uri: &'a str,
    /// Protocol version, normally `RTSP/1.0`.
    pub version: &'a str,
    pub headers: Headers<'a>,
    /// `Content-Length` bytes after the header block, or everything after
    /// it when no length was declared.
    pub body: &'a [u8],
}

impl<'a> RtspRequest<'a> {
    /// Parse with [`ParseConfig::default`].
    ///
    /// ```
    /// use rtsp_scan::RtspRequest;
    ///
    /// let req = RtspRequest::parse("OPTIONS rtsp://localhost:8554/test RTSP/1.0\r\nCSeq: 1\r\n\r\n").unwrap();
    /// assert_eq!(req.method, "OPTIONS");
    /// assert_eq!(req.cseq(), Some("1"));
    /// ```
    pub fn parse(raw: &'a (impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
        Self::parse_with(raw, &ParseConfig::default())
    }

    pub fn parse_with(raw: &'a (impl AsRef<[u8]> + ?Sized), config: &ParseConfig) -> Result<Self> {
        let mut scanner = Scanner::new(raw.as_ref());
        if scanner.is_exhausted() {
            return Err(ScanError::parse(ParseErrorKind::EmptyMessage, 1));
        }

        let (method, uri, version) = parse_request_line(&mut scanner)?;
        if version != "RTSP/1.0" {
            tracing::warn!(version, "client sent non-RTSP/1.0 version");
        }

        let headers = Headers::parse(&mut scanner, config)?;
        let body = take_body(&mut scanner, &headers);
        tracing::debug!(
            method,
            uri,
            headers = headers.len(),
            body = body.len(),
            "parsed request"
        );

        Ok(RtspRequest {
            method,
            uri,
            version,
            headers,
            body,
        })
    }

    /// Look up a header value by name (case-insensitive, per RFC 2326 §4.2).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the CSeq header value (RFC 2326 §12.17).
    pub fn cseq(&self) -> Option<&str> {
        self.headers.cseq()
    }

    /// Splits [`uri`](Self::uri) into scheme, authority, path and query.
    pub fn request_uri(&self) -> Result<RequestUri<'a>> {
        RequestUri::parse(self.uri)
    }

    /// Parses the `Range` header, if present.
    pub fn range(&self) -> Option<Result<NptRange>> {
        self.headers.range()
    }
}

fn parse_request_line<'a>(scanner: &mut Scanner<'a>) -> Result<(&'a str, &'a str, &'a str)> {
    let method = scanner.consume_word();
    if method.is_empty() || skip_linear_whitespace(scanner) == 0 {
        return Err(invalid_request_line(scanner));
    }
    let uri = scanner.consume_until_whitespace();
    if uri.is_empty() || skip_linear_whitespace(scanner) == 0 {
        return Err(invalid_request_line(scanner));
    }
    let version = scanner.consume_until_whitespace();
    skip_linear_whitespace(scanner);
    let at_eol = scanner.is_exhausted() || matches!(scanner.peek(), b'\r' | b'\n');
    if version.is_empty() || !at_eol {
        return Err(invalid_request_line(scanner));
    }
    scanner.expect_eol();

    Ok((
        text(method, scanner)?,
        text(uri, scanner)?,
        text(version, scanner)?,
    ))
}

fn invalid_request_line(scanner: &Scanner<'_>) -> ScanError {
    ScanError::parse(ParseErrorKind::InvalidRequestLine, scanner.line_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_options_request() {
        let raw = "OPTIONS rtsp://localhost:8554/test RTSP/1.0\r\nCSeq: 1\r\n\r\n";
        let req = RtspRequest::parse(raw).unwrap();
        assert_eq!(req.method, "OPTIONS");
        assert_eq!(req.uri, "rtsp://localhost:8554/test");
        assert_eq!(req.version, "RTSP/1.0");
        assert_eq!(req.cseq(), Some("1"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn parse_setup_with_transport() {
        let raw = "SETUP rtsp://localhost:8554/test/track1 RTSP/1.0\r\n\
                   CSeq: 3\r\n\
                   Transport: RTP/AVP;unicast;client_port=8000-8001\r\n\r\n";
        let req = RtspRequest::parse(raw).unwrap();
        assert_eq!(req.method, "SETUP");
        assert_eq!(req.cseq(), Some("3"));
        assert_eq!(
            req.get_header("Transport"),
            Some("RTP/AVP;unicast;client_port=8000-8001")
        );
        assert_eq!(req.request_uri().unwrap().path, "/test/track1");
    }

    #[test]
    fn parse_empty_request() {
        let err = RtspRequest::parse("").unwrap_err();
        assert_eq!(err.kind(), Some(&ParseErrorKind::EmptyMessage));
    }

    #[test]
    fn parse_invalid_request_line() {
        for raw in [
            "JUST_A_METHOD\r\n\r\n",
            "PLAY rtsp://host/a\r\n\r\n",
            "PLAY  \r\n",
            " PLAY rtsp://host/a RTSP/1.0\r\n",
            "PLAY rtsp://x RTSP/1.0 junk\r\nCSeq: 1\r\n\r\n",
        ] {
            let err = RtspRequest::parse(raw).unwrap_err();
            assert_eq!(err.kind(), Some(&ParseErrorKind::InvalidRequestLine), "{raw:?}");
        }
    }

    #[test]
    fn version_allows_trailing_blanks_only() {
        let req = RtspRequest::parse("PLAY rtsp://x RTSP/1.0 \t\r\nCSeq: 1\r\n\r\n").unwrap();
        assert_eq!(req.version, "RTSP/1.0");
        assert_eq!(req.cseq(), Some("1"));

        let req = RtspRequest::parse("OPTIONS * RTSP/1.0").unwrap();
        assert_eq!(req.version, "RTSP/1.0");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn header_without_colon_is_rejected_on_its_line() {
        let raw = "OPTIONS rtsp://h/a RTSP/1.0\r\nCSeq: 1\r\nbogus line\r\nAccept: x\r\n\r\n";
        let err = RtspRequest::parse(raw).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Parse {
                kind: ParseErrorKind::InvalidHeader,
                line: 3
            }
        ));
    }

    #[test]
    fn header_lookup_case_insensitive() {
        let raw = "OPTIONS rtsp://localhost RTSP/1.0\r\ncseq: 42\r\n\r\n";
        let req = RtspRequest::parse(raw).unwrap();
        assert_eq!(req.get_header("CSeq"), Some("42"));
        assert_eq!(req.get_header("cseq"), Some("42"));
        assert_eq!(req.get_header("CSEQ"), Some("42"));
    }

    #[test]
    fn bare_line_feeds_and_method_with_underscore() {
        let raw = b"GET_PARAMETER rtsp://cam/live RTSP/1.0\nCSeq: 8\nSession: 1A2B\n\n";
        let req = RtspRequest::parse(raw).unwrap();
        assert_eq!(req.method, "GET_PARAMETER");
        assert_eq!(req.headers.session(), Some("1A2B"));
    }

    #[test]
    fn body_is_bounded_by_content_length() {
        let raw = "SET_PARAMETER rtsp://cam RTSP/1.0\r\nContent-Length: 5\r\n\r\nhellotrailing";
        let req = RtspRequest::parse(raw).unwrap();
        assert_eq!(req.body, b"hello");

        let raw = "SET_PARAMETER rtsp://cam RTSP/1.0\r\nContent-Length: 50\r\n\r\nshort";
        assert_eq!(RtspRequest::parse(raw).unwrap().body, b"short");
    }

    #[test]
    fn play_range() {
        let raw = "PLAY rtsp://cam/live RTSP/1.0\r\nCSeq: 4\r\nRange: npt=0.000-\r\n";
        let req = RtspRequest::parse(raw).unwrap();
        let range = req.range().unwrap().unwrap();
        assert_eq!(range.start, Some(crate::protocol::NptTime::Seconds(0.0)));
        assert_eq!(range.end, None);
    }
}
