//! Tokenizing RTSP messages (RFC 2326) with the [`Scanner`].
//!
//! RTSP messages follow HTTP/1.1 syntax:
//!
//! ```text
//! DESCRIBE rtsp://server/stream RTSP/1.0\r\n
//! CSeq: 2\r\n
//! Accept: application/sdp\r\n
//! \r\n
//! ```
//!
//! Everything here is built from scanner calls and borrows from the input
//! buffer. Only the *shape* of a message is checked: the method is whatever
//! word starts the request line, and header values are not interpreted
//! beyond the few lookups [`Headers`] offers.
//!
//! | Element | Type |
//! |---------|------|
//! | Request line + headers + body | [`RtspRequest`] |
//! | Status line + headers + body | [`RtspResponse`] |
//! | Header block | [`Headers`] |
//! | Request-URI | [`RequestUri`] |
//! | `Range: npt=...` | [`NptRange`] |

pub mod header;
pub mod range;
pub mod request;
pub mod response;
pub mod uri;

pub use header::{Header, Headers};
pub use range::{NptRange, NptTime};
pub use request::RtspRequest;
pub use response::RtspResponse;
pub use uri::RequestUri;

use std::str::FromStr;

use crate::error::{ParseErrorKind, Result, ScanError};
use crate::mask::Mask;
use crate::scanner::Scanner;

/// Stops on anything but space or tab. Unlike the general whitespace mask
/// it never crosses a line end.
const LINEAR_WHITESPACE: Mask = Mask::from_stop_bytes(b" \t").inverted();

/// Knobs for message tokenizing.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Upper bound on header lines per message.
    pub max_headers: usize,
    /// Join continuation lines (starting with space or tab) onto the
    /// previous header value. When `false` they are rejected.
    pub fold_continuations: bool,
    /// Reject a header block that reaches the end of the buffer without the
    /// terminating blank line.
    pub require_terminator: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_headers: 64,
            fold_continuations: true,
            require_terminator: false,
        }
    }
}

/// Skips spaces and tabs on the current line, returning how many.
fn skip_linear_whitespace(scanner: &mut Scanner<'_>) -> usize {
    scanner.consume_until(&LINEAR_WHITESPACE).len()
}

/// Reads a run of digits as a `T`. `None` when there are no digits or the
/// value does not fit; unlike [`Scanner::consume_integer`] it never wraps.
fn decimal<T: FromStr>(scanner: &mut Scanner<'_>) -> Option<T> {
    let (digits, _) = scanner.consume_integer();
    if digits.is_empty() {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn text<'a>(bytes: &'a [u8], scanner: &Scanner<'_>) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|_| ScanError::parse(ParseErrorKind::NotUtf8, scanner.line_number()))
}

/// Takes the message body: `Content-Length` bytes when declared, the rest of
/// the buffer otherwise.
fn take_body<'a>(scanner: &mut Scanner<'a>, headers: &Headers<'_>) -> &'a [u8] {
    match headers.content_length() {
        Some(declared) => {
            let body = scanner.consume_length(declared);
            if body.len() < declared {
                tracing::warn!(declared, available = body.len(), "body shorter than Content-Length");
            }
            body
        }
        None => {
            let remaining = scanner.remaining_len();
            scanner.consume_length(remaining)
        }
    }
}
