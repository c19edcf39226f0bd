use crate::error::{ParseErrorKind, Result, ScanError};
use crate::protocol::header::Headers;
use crate::protocol::{ParseConfig, decimal, skip_linear_whitespace, take_body, text};
use crate::scanner::Scanner;

/// A tokenized RTSP response (RFC 2326 §7).
///
/// ```text
/// RTSP/1.0 200 OK\r\n
/// CSeq: 1\r\n
/// Content-Type: application/sdp\r\n
/// Content-Length: 142\r\n
/// \r\n
/// v=0\r\n...
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RtspResponse<'a> {
    pub version: &'a str,
    pub status_code: u16,
    /// Reason phrase; may be empty.
    pub reason: &'a str,
    pub headers: Headers<'a>,
    pub body: &'a [u8],
}

impl<'a> RtspResponse<'a> {
    pub fn parse(raw: &'a (impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
        Self::parse_with(raw, &ParseConfig::default())
    }

    pub fn parse_with(raw: &'a (impl AsRef<[u8]> + ?Sized), config: &ParseConfig) -> Result<Self> {
        let mut scanner = Scanner::new(raw.as_ref());
        if scanner.is_exhausted() {
            return Err(ScanError::parse(ParseErrorKind::EmptyMessage, 1));
        }

        let version = scanner.consume_until_whitespace();
        if version.is_empty() || skip_linear_whitespace(&mut scanner) == 0 {
            return Err(invalid_status_line(&scanner));
        }
        let Some(status_code) = decimal::<u16>(&mut scanner) else {
            return Err(invalid_status_line(&scanner));
        };
        let separated = skip_linear_whitespace(&mut scanner) > 0;
        if !separated && !matches!(scanner.peek(), b'\r' | b'\n' | 0) {
            return Err(invalid_status_line(&scanner));
        }
        let reason = scanner.consume_until_eol().trim_ascii_end();
        scanner.expect_eol();

        let version = text(version, &scanner)?;
        let reason = text(reason, &scanner)?;
        let headers = Headers::parse(&mut scanner, config)?;
        let body = take_body(&mut scanner, &headers);
        tracing::debug!(status_code, reason, headers = headers.len(), "parsed response");

        Ok(RtspResponse {
            version,
            status_code,
            reason,
            headers,
            body,
        })
    }

    /// 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn cseq(&self) -> Option<&str> {
        self.headers.cseq()
    }
}

fn invalid_status_line(scanner: &Scanner<'_>) -> ScanError {
    ScanError::parse(ParseErrorKind::InvalidStatusLine, scanner.line_number())
}
