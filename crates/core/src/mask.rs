//! Byte classification tables ("stop masks").
//!
//! A [`Mask`] answers one question for every byte value: does this byte end
//! the current token? The [`Scanner`](crate::Scanner) keeps consuming bytes
//! until it reaches one the mask marks as a stop byte.
//!
//! The built-in masks cover the token shapes of RTSP/HTTP start lines and
//! header blocks:
//!
//! | Mask | Stops on |
//! |------|----------|
//! | [`NON_WORD`] | anything except `[A-Za-z0-9_]` |
//! | [`WORD`] | `[A-Za-z0-9_]` |
//! | [`DIGIT`] | `[0-9]` |
//! | [`EOL`] | `\r`, `\n` |
//! | [`WHITESPACE`] | anything except `\t \n \v \f \r` and space |
//! | [`EOL_WHITESPACE`] | `\t \n \v \f \r` and space |
//! | [`EOL_WHITESPACE_QUERY`] | as above, plus `?` |
//! | [`URL_STOP`] | `\t \n \r`, space and `?` |

use std::fmt;

/// Builds a 256-entry table at compile time from a stop predicate over `$b`.
macro_rules! mask {
    ($b:ident => $stop:expr) => {{
        let mut stops = [false; 256];
        let mut i = 0;
        while i < 256 {
            let $b = i as u8;
            stops[i] = $stop;
            i += 1;
        }
        Mask { stops }
    }};
}

/// A byte-indexed table of stop conditions.
///
/// `true` at index `b` means byte `b` terminates consumption.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Mask {
    stops: [bool; 256],
}

impl Mask {
    /// A mask with no stop bytes. Consuming with it runs to the end of the
    /// buffer.
    pub const NEVER: Mask = Mask {
        stops: [false; 256],
    };

    /// Build a mask that stops on exactly the given bytes.
    ///
    /// ```
    /// use rtsp_scan::{Mask, Scanner};
    ///
    /// const PARAM: Mask = Mask::from_stop_bytes(b";=");
    /// let mut s = Scanner::from("client_port=8000-8001;mode=play");
    /// assert_eq!(s.consume_until(&PARAM), b"client_port");
    /// ```
    pub const fn from_stop_bytes(bytes: &[u8]) -> Mask {
        let mut stops = [false; 256];
        let mut i = 0;
        while i < bytes.len() {
            stops[bytes[i] as usize] = true;
            i += 1;
        }
        Mask { stops }
    }

    /// Returns a copy of this mask that also stops on `byte`.
    pub const fn with_stop(mut self, byte: u8) -> Mask {
        self.stops[byte as usize] = true;
        self
    }

    /// Returns the complement: stop bytes become pass-through and vice versa.
    pub const fn inverted(self) -> Mask {
        let mut stops = self.stops;
        let mut i = 0;
        while i < 256 {
            stops[i] = !stops[i];
            i += 1;
        }
        Mask { stops }
    }

    #[inline]
    pub const fn stops_at(&self, byte: u8) -> bool {
        self.stops[byte as usize]
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stops: Vec<u8> = (0..=u8::MAX).filter(|&b| self.stops_at(b)).collect();
        f.debug_struct("Mask")
            .field("stop_count", &stops.len())
            .field("stops", &stops)
            .finish()
    }
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// \t \n \v \f \r and space
const fn is_space_byte(b: u8) -> bool {
    matches!(b, b'\t'..=b'\r' | b' ')
}

const NON_WORD_TABLE: Mask = mask!(b => !is_word_byte(b));
const EOL_WHITESPACE_TABLE: Mask = mask!(b => is_space_byte(b));

/// Stops on every byte that is not an ASCII letter, digit or underscore.
pub static NON_WORD: Mask = NON_WORD_TABLE;

/// Stops on ASCII letters, digits and underscore.
pub static WORD: Mask = NON_WORD_TABLE.inverted();

/// Stops on an ASCII digit.
pub static DIGIT: Mask = mask!(b => b.is_ascii_digit());

/// Stops on `\r` or `\n`.
pub static EOL: Mask = Mask::from_stop_bytes(b"\r\n");

/// Stops on the first non-whitespace byte, so consuming with it skips a
/// whitespace run.
pub static WHITESPACE: Mask = EOL_WHITESPACE_TABLE.inverted();

/// Stops on whitespace, including line terminators.
pub static EOL_WHITESPACE: Mask = EOL_WHITESPACE_TABLE;

/// Stops on whitespace or the `?` that introduces a query string.
pub static EOL_WHITESPACE_QUERY: Mask = EOL_WHITESPACE_TABLE.with_stop(b'?');

/// Stops at the end of the path component of a request URI.
pub static URL_STOP: Mask = Mask::from_stop_bytes(b"\t\n\r ?");

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_bytes(mask: &Mask) -> Vec<u8> {
        (0..=u8::MAX).filter(|&b| mask.stops_at(b)).collect()
    }

    #[test]
    fn word_masks_are_complements() {
        for b in 0..=u8::MAX {
            assert_ne!(NON_WORD.stops_at(b), WORD.stops_at(b), "byte {b}");
        }
        assert!(!NON_WORD.stops_at(b'_'));
        assert!(!NON_WORD.stops_at(b'7'));
        assert!(!NON_WORD.stops_at(b'q'));
        assert!(NON_WORD.stops_at(b'-'));
        assert!(NON_WORD.stops_at(0xC3));
    }

    #[test]
    fn digit_mask_stops_only_on_digits() {
        assert_eq!(stop_bytes(&DIGIT), b"0123456789");
    }

    #[test]
    fn line_and_url_masks() {
        assert_eq!(stop_bytes(&EOL), b"\n\r");
        assert_eq!(stop_bytes(&URL_STOP), b"\t\n\r ?");
        assert_eq!(stop_bytes(&EOL_WHITESPACE), b"\t\n\x0b\x0c\r ");
        assert_eq!(stop_bytes(&EOL_WHITESPACE_QUERY), b"\t\n\x0b\x0c\r ?");
    }

    #[test]
    fn whitespace_mask_passes_only_whitespace() {
        for b in 0..=u8::MAX {
            assert_eq!(WHITESPACE.stops_at(b), !EOL_WHITESPACE.stops_at(b));
        }
    }

    #[test]
    fn never_mask_has_no_stops() {
        assert!(stop_bytes(&Mask::NEVER).is_empty());
        assert_eq!(Mask::NEVER.inverted(), Mask::from_stop_bytes(&[]).inverted());
    }
}
