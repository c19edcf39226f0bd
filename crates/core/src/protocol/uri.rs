use crate::error::{ParseErrorKind, Result, ScanError};
use crate::protocol::{decimal, text};
use crate::scanner::Scanner;

/// A Request-URI split into its parts (RFC 2326 §3.2).
///
/// ```text
/// rtsp://192.168.1.105:8554/test.264/track1?channel=1&token=888888
/// \__/   \________________/\______________/ \____________________/
/// scheme     authority           path               query
/// ```
///
/// Absolute paths (`/stream`) and `*` have no scheme or authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestUri<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> RequestUri<'a> {
    /// Splits a Request-URI. The value is scanned on its own, so errors
    /// report line 1; [`RtspRequest::request_uri`](crate::RtspRequest::request_uri)
    /// errors match because the request line is always the first line.
    ///
    /// ```
    /// use rtsp_scan::RequestUri;
    ///
    /// let uri = RequestUri::parse("rtsp://172.22.0.172/123.ts/?channel=1").unwrap();
    /// assert_eq!(uri.authority, Some("172.22.0.172"));
    /// assert_eq!(uri.path, "/123.ts/");
    /// assert_eq!(uri.query, Some("channel=1"));
    /// ```
    pub fn parse(uri: &'a str) -> Result<Self> {
        let invalid = || ScanError::parse(ParseErrorKind::InvalidUri, 1);
        let mut outer = Scanner::from(uri);

        let target = outer.consume_url();
        if target.is_empty() {
            return Err(invalid());
        }
        let query = if outer.expect(b'?') {
            Some(text(outer.consume_until_whitespace(), &outer)?)
        } else {
            None
        };

        let mut inner = Scanner::new(target);
        let (scheme, authority) = match inner.peek() {
            b'/' | b'*' => (None, None),
            _ => {
                let scheme = inner.consume_word();
                let separated = inner.expect(b':') && inner.expect(b'/') && inner.expect(b'/');
                if scheme.is_empty() || !separated {
                    return Err(invalid());
                }
                let authority = inner.consume_until_byte(b'/');
                if authority.is_empty() {
                    return Err(invalid());
                }
                (Some(text(scheme, &inner)?), Some(text(authority, &inner)?))
            }
        };
        let remaining = inner.remaining_len();
        let path = text(inner.consume_length(remaining), &inner)?;

        Ok(RequestUri {
            scheme,
            authority,
            path,
            query,
        })
    }

    /// Splits the authority into host and port. The port is `None` when it
    /// is absent or not a valid `u16`. Bracketed IPv6 hosts keep their
    /// brackets.
    pub fn host_and_port(&self) -> Option<(&'a str, Option<u16>)> {
        let authority = self.authority?;
        let mut scanner = Scanner::from(authority);
        let host_len = if scanner.peek() == b'[' {
            let (host, closed) = scanner.get_through(b']');
            if !closed {
                return None;
            }
            host.len() + 1
        } else {
            scanner.consume_until_byte(b':').len()
        };
        let port = if scanner.expect(b':') {
            decimal::<u16>(&mut scanner).filter(|_| scanner.is_exhausted())
        } else {
            None
        };
        Some((&authority[..host_len], port))
    }

    pub fn host(&self) -> Option<&'a str> {
        self.host_and_port().map(|(host, _)| host)
    }

    pub fn port(&self) -> Option<u16> {
        self.host_and_port().and_then(|(_, port)| port)
    }
}
