//! Numeric literals: unsigned integers, fixed-point decimals and RTSP
//! Normal Play Time (RFC 2326 §3.6).

use super::Scanner;

/// NPT has at most `hh:mm:ss.fraction`.
const NPT_FIELDS: usize = 4;

impl<'a> Scanner<'a> {
    /// Consumes a run of ASCII digits and returns it with its value.
    ///
    /// The value is accumulated modulo 2^64, so absurdly long runs wrap
    /// instead of failing. An empty run yields `("", 0)`.
    ///
    /// ```
    /// use rtsp_scan::Scanner;
    ///
    /// let mut s = Scanner::from("200 OK");
    /// assert_eq!(s.consume_integer(), (&b"200"[..], 200));
    /// ```
    pub fn consume_integer(&mut self) -> (&'a [u8], u64) {
        let mut value = 0u64;
        let literal = self.consume_while_byte(|b| {
            if !b.is_ascii_digit() {
                return false;
            }
            value = value.wrapping_mul(10).wrapping_add(u64::from(b - b'0'));
            true
        });
        (literal, value)
    }

    /// Consumes `digits[.digits]` as a decimal. No sign, no exponent.
    pub fn consume_float(&mut self) -> f64 {
        let (_, whole) = self.consume_digit_field();
        let mut value = whole;
        if self.expect(b'.') {
            let mut divisor = 1.0;
            self.consume_while_byte(|b| {
                if !b.is_ascii_digit() {
                    return false;
                }
                divisor *= 10.0;
                value += f64::from(b - b'0') / divisor;
                true
            });
        }
        value
    }

    /// Consumes an NPT time, `SS[.frac]` or `HH:MM:SS[.frac]`, and returns
    /// it in seconds.
    ///
    /// A `:` seen before the second field switches to the clock form;
    /// otherwise only `seconds.fraction` is read. Parsing stops at the first
    /// byte that does not fit the form, such as the `-` of an NPT range.
    ///
    /// ```
    /// use rtsp_scan::Scanner;
    ///
    /// assert_eq!(Scanner::from("01:23:45.5").consume_npt(), 5025.5);
    /// let mut range = Scanner::from("12.25-30");
    /// assert_eq!(range.consume_npt(), 12.25);
    /// assert_eq!(range.peek(), b'-');
    /// ```
    pub fn consume_npt(&mut self) -> f64 {
        if self.is_exhausted() {
            return 0.0;
        }
        let mut values = [0.0f64; NPT_FIELDS];
        let mut scales = [1.0f64; NPT_FIELDS];
        let mut clock = false;

        for field in 0..NPT_FIELDS {
            let (scale, value) = self.consume_digit_field();
            values[field] = value;
            scales[field] = scale;

            if self.is_exhausted() || (!clock && field >= 1) {
                break;
            }
            let accepted = match self.peek() {
                b'.' => (!clock && field == 0) || field == 2,
                b':' if field < 2 => {
                    clock = true;
                    true
                }
                _ => false,
            };
            if !accepted {
                break;
            }
            self.advance();
        }

        if clock {
            values[0] * 3600.0 + values[1] * 60.0 + values[2] + values[3] / scales[3]
        } else {
            values[0] + values[1] / scales[1]
        }
    }

    /// Reads one digit run as a float, returning `10^digits` alongside the
    /// value so a fractional field can be scaled down.
    fn consume_digit_field(&mut self) -> (f64, f64) {
        let mut scale = 1.0;
        let mut value = 0.0;
        self.consume_while_byte(|b| {
            if !b.is_ascii_digit() {
                return false;
            }
            value = value * 10.0 + f64::from(b - b'0');
            scale *= 10.0;
            true
        });
        (scale, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npt(text: &str) -> f64 {
        Scanner::from(text).consume_npt()
    }

    #[test]
    fn integer_literal_and_value() {
        let mut s = Scanner::from("RTSP 200 OK");
        assert_eq!(s.consume_integer(), (&b""[..], 0));
        assert_eq!(s.consume_word(), b"RTSP");
        s.consume_whitespace();
        assert_eq!(s.consume_integer(), (&b"200"[..], 200));
        s.consume_whitespace();
        assert_eq!(s.consume_word(), b"OK");
    }

    #[test]
    fn integer_on_empty_input() {
        assert_eq!(Scanner::from("").consume_integer(), (&b""[..], 0));
    }

    #[test]
    fn integer_wraps_instead_of_failing() {
        let mut s = Scanner::from("18446744073709551616x");
        let (literal, value) = s.consume_integer();
        assert_eq!(literal, b"18446744073709551616");
        assert_eq!(value, 0);
        assert_eq!(s.peek(), b'x');
    }

    #[test]
    fn float_with_and_without_fraction() {
        assert_eq!(Scanner::from("42").consume_float(), 42.0);
        assert_eq!(Scanner::from("1.5").consume_float(), 1.5);
        assert_eq!(Scanner::from(".25").consume_float(), 0.25);
        assert!((Scanner::from("3.14159").consume_float() - 3.14159).abs() < 1e-12);

        let mut s = Scanner::from("2.5.7");
        assert_eq!(s.consume_float(), 2.5);
        assert_eq!(s.rest(), b".7");
    }

    #[test]
    fn float_stops_at_sign_and_exponent() {
        let mut s = Scanner::from("-1");
        assert_eq!(s.consume_float(), 0.0);
        assert_eq!(s.peek(), b'-');

        let mut s = Scanner::from("1e3");
        assert_eq!(s.consume_float(), 1.0);
        assert_eq!(s.peek(), b'e');
    }

    #[test]
    fn npt_seconds_form() {
        let mut s = Scanner::from("0.000-");
        assert_eq!(s.consume_npt(), 0.0);
        assert_eq!(s.peek(), b'-');

        assert_eq!(npt("10"), 10.0);
        assert_eq!(npt("10.5"), 10.5);
        assert_eq!(npt("7.125"), 7.125);
    }

    #[test]
    fn npt_clock_form() {
        assert_eq!(npt("01:23:45.5"), 5025.5);
        assert_eq!(npt("0:00:10"), 10.0);
        assert_eq!(npt("2:30"), 7200.0 + 1800.0);
    }

    #[test]
    fn npt_seconds_form_stops_after_fraction() {
        let mut s = Scanner::from("1.5:30");
        assert_eq!(s.consume_npt(), 1.5);
        assert_eq!(s.rest(), b":30");
    }

    #[test]
    fn npt_clock_form_ignores_extra_separators() {
        let mut s = Scanner::from("1:02:03:04");
        assert_eq!(s.consume_npt(), 3600.0 + 120.0 + 3.0);
        assert_eq!(s.rest(), b":04");

        let mut s = Scanner::from("1:02.5");
        assert_eq!(s.consume_npt(), 3600.0 + 120.0);
        assert_eq!(s.rest(), b".5");
    }

    #[test]
    fn npt_stops_on_unrelated_byte() {
        let mut s = Scanner::from("now-");
        assert_eq!(s.consume_npt(), 0.0);
        assert_eq!(s.parsed_len(), 0);
    }
}
