//! Tiny pure functions converting matched substrings to numbers.

use crate::error::TgError;

/// Parse a non-negative base-10 integer, rejecting overflow of `i32`. Matches the original's
/// `tg_atoi`: the regex character classes already guarantee the text is digits-only, so the only
/// failure mode left is magnitude.
pub fn parse_uint(s: &str) -> Option<i32> {
    let v: i64 = s.parse().ok()?;
    if v < 0 || v >= i32::MAX as i64 {
        None
    } else {
        Some(v as i32)
    }
}

/// Map an English month name (abbreviated or full) to `0..11`. Dispatches on the first character
/// and disambiguates with the second/third the way `tg_atom` does, rather than scanning a table.
pub fn decode_month(s: &str) -> Option<u8> {
    let b = s.as_bytes();
    if b.len() < 3 {
        return None;
    }
    match b[0] {
        b'A' => Some(if b[1] == b'p' { 3 } else { 7 }),       // Apr / Aug
        b'D' => Some(11),                                     // Dec
        b'F' => Some(1),                                      // Feb
        b'J' => Some(if b[1] == b'a' {
                     0
                 } else if b[2] == b'n' {
                     5
                 } else {
                     6
                 }),                                          // Jan / Jun / Jul
        b'M' => Some(if b[2] == b'r' { 2 } else { 4 }),       // Mar / May
        b'N' => Some(10),                                     // Nov
        b'O' => Some(9),                                      // Oct
        b'S' => Some(8),                                      // Sep
        _ => None,
    }
}

/// Decode a matched timezone designator into seconds east of UTC.
pub fn decode_timezone(s: &str) -> Result<i32, TgError> {
    let b = s.as_bytes();
    let bad = || TgError::BadTimezone(s.to_string());

    match b.len() {
        5 => {
            // +HHMM
            let hh = digit(b[1]).ok_or_else(bad)? * 10 + digit(b[2]).ok_or_else(bad)?;
            let mm = digit(b[3]).ok_or_else(bad)? * 10 + digit(b[4]).ok_or_else(bad)?;
            let secs = hh * 3600 + mm * 60;
            Ok(if b[0] == b'-' { -secs } else { secs })
        },
        6 => {
            // +HH:MM
            let hh = digit(b[1]).ok_or_else(bad)? * 10 + digit(b[2]).ok_or_else(bad)?;
            let mm = digit(b[4]).ok_or_else(bad)? * 10 + digit(b[5]).ok_or_else(bad)?;
            let secs = hh * 3600 + mm * 60;
            Ok(if b[0] == b'-' { -secs } else { secs })
        },
        1 => {
            // Military single-letter zone, RFC-822, excluding 'J'.
            let h: i32 = match b[0] {
                b'A' => -1,
                b'B' => -2,
                b'C' => -3,
                b'D' => -4,
                b'E' => -5,
                b'F' => -6,
                b'G' => -7,
                b'H' => -8,
                b'I' => -9,
                b'K' => -10,
                b'L' => -11,
                b'M' => -12,
                b'N' => 1,
                b'O' => 2,
                b'P' => 3,
                b'Q' => 4,
                b'R' => 5,
                b'S' => 6,
                b'T' => 7,
                b'U' => 8,
                b'V' => 9,
                b'W' => 10,
                b'X' => 11,
                b'Y' => 12,
                b'Z' => 0,
                _ => return Err(bad()),
            };
            Ok(h * 3600)
        },
        n if n >= 2 => {
            let h: i32 = match b[0] {
                b'U' | b'G' => 0, // UT, UTC, GMT
                b'E' => {
                    if b[1] == b'S' {
                        -5
                    } else {
                        -4
                    }
                }, // EST, EDT
                b'C' => {
                    if b[1] == b'S' {
                        -6
                    } else {
                        -5
                    }
                }, // CST, CDT
                b'M' => {
                    if b[1] == b'S' {
                        -7
                    } else {
                        -6
                    }
                }, // MST, MDT
                b'P' => {
                    if b[1] == b'S' {
                        -8
                    } else {
                        -7
                    }
                }, // PST, PDT
                _ => return Err(bad()),
            };
            Ok(h * 3600)
        },
        _ => Err(bad()),
    }
}

fn digit(b: u8) -> Option<i32> {
    if b.is_ascii_digit() {
        Some((b - b'0') as i32)
    } else {
        None
    }
}
