//! Small helpers shared by the solver, the reader and the command line front end.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch as a float, 0.0 if the clock is before the epoch.
pub fn get_current_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Parses a leading decimal integer the way C's `atoi` does: leading whitespace is skipped, an
/// optional sign is accepted, then digits are read until the first non digit. Returns `None` if
/// no digit was found. Values beyond `i64` saturate.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for c in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add((c - b'0') as i64);
    }

    match (seen, negative) {
        (false, _) => None,
        (true, true) => Some(-value),
        (true, false) => Some(value),
    }
}

/// Parses a whole token strictly as an integer, surrounding whitespace allowed.
pub fn parse_exact_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}
