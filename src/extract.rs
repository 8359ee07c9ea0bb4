//! Datetime extractor: locates a datetime token in a line and converts it to an absolute epoch
//! second.

use regex::Captures;

use crate::context::ParserContext;
use crate::error::TgError;
use crate::token;

/// Largest token the compiler's character classes can ever produce (a 20-digit `%s` epoch, or a
/// 33-byte `%Z` zone name). Spec §4.3/§9: a deliberate static ceiling, not re-derived per call.
const CAPTURE_BUF_LEN: usize = 34;

/// Fixed-size scratch buffer a captured substring is copied into before decoding, mirroring the
/// original's stack `char buffer[35]`. Overflow is unreachable under the compiler's character
/// classes (asserted, not silently truncated).
struct CaptureBuf {
    buf: [u8; CAPTURE_BUF_LEN],
    len: usize,
}
impl CaptureBuf {
    fn copy(s: &str) -> Self {
        let bytes = s.as_bytes();
        debug_assert!(bytes.len() <= CAPTURE_BUF_LEN, "captured token exceeds the 34-byte scratch buffer");
        let len = bytes.len().min(CAPTURE_BUF_LEN);
        let mut buf = [0u8; CAPTURE_BUF_LEN];
        buf[..len].copy_from_slice(&bytes[..len]);
        CaptureBuf { buf, len }
    }
    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

/// Outcome of an extraction attempt.
pub enum ExtractOutcome {
    Found(i64),
    NotFound,
    Error(TgError),
}

/// Run the compiled regex on `line` and convert the match to an epoch second.
pub fn extract_timestamp(line: &[u8], ctx: &ParserContext) -> ExtractOutcome {
    let text = match std::str::from_utf8(line) {
        Ok(s) => s,
        Err(_) => return ExtractOutcome::NotFound,
    };

    let caps = match ctx.re.captures(text) {
        Some(c) => c,
        None => return ExtractOutcome::NotFound,
    };

    if !ctx.fallback {
        extract_direct(&caps, ctx)
    } else {
        extract_fallback(&caps, ctx)
    }
}

fn group_str<'t>(caps: &Captures<'t>, idx: Option<usize>) -> Option<&'t str> {
    idx.and_then(|i| caps.get(i)).map(|m| m.as_str())
}

/// Trust the named captures directly and assemble a broken-down time from them.
fn extract_direct(caps: &Captures, ctx: &ParserContext) -> ExtractOutcome {
    let gi = &ctx.group_index;
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };

    macro_rules! decode_uint {
        ($slot:expr, $idx:expr, $adjust:expr) => {
            if let Some(s) = group_str(caps, $idx) {
                let buf = CaptureBuf::copy(s);
                match token::parse_uint(buf.as_str()) {
                    Some(v) => $slot = $adjust(v),
                    None => return ExtractOutcome::NotFound,
                }
            }
        };
    }

    decode_uint!(tm.tm_year, gi.year, |v: i32| v - 1900);
    decode_uint!(tm.tm_mon, gi.month, |v: i32| v - 1);
    decode_uint!(tm.tm_mday, gi.day, |v: i32| v);
    decode_uint!(tm.tm_hour, gi.hour, |v: i32| v);
    decode_uint!(tm.tm_min, gi.minute, |v: i32| v);
    decode_uint!(tm.tm_sec, gi.second, |v: i32| v);

    if let Some(s) = group_str(caps, gi.month_t) {
        let buf = CaptureBuf::copy(s);
        match token::decode_month(buf.as_str()) {
            Some(m) => tm.tm_mon = m as i32,
            None => return ExtractOutcome::NotFound,
        }
    }

    let mut tz_offset: Option<i64> = None;
    if let Some(s) = group_str(caps, gi.timezone) {
        let buf = CaptureBuf::copy(s);
        match token::decode_timezone(buf.as_str()) {
            Ok(off) => tz_offset = Some(off as i64),
            // Unreachable under the compiler's character classes; treated as a data-plane
            // recoverable rather than propagated, matching the decoder-surfaces-NotFound rule.
            Err(_) => return ExtractOutcome::NotFound,
        }
    }

    // `timestamp` short-circuits: its value is already an absolute epoch second, so timezone
    // resolution and the broken-down-time conversion are skipped entirely.
    if let Some(s) = group_str(caps, gi.timestamp) {
        let buf = CaptureBuf::copy(s);
        return match buf.as_str().parse::<i64>() {
            Ok(ts) => ExtractOutcome::Found(ts),
            Err(_) => ExtractOutcome::NotFound,
        };
    }

    let offset = tz_offset.unwrap_or(ctx.local_offset_secs);
    match crate::strptime::timegm_utc(&tm) {
        Some(ts) => ExtractOutcome::Found(ts - offset),
        None => ExtractOutcome::NotFound,
    }
}

/// The regex only located the token; reparse it with the platform `strptime`.
fn extract_fallback(caps: &Captures, ctx: &ParserContext) -> ExtractOutcome {
    let whole = match caps.get(0) {
        Some(m) => m.as_str(),
        None => return ExtractOutcome::NotFound,
    };

    let tm = match crate::strptime::parse(whole, &ctx.format) {
        Some(tm) => tm,
        None => return ExtractOutcome::NotFound,
    };

    let offset = if ctx.format_has_timezone { tm.tm_gmtoff as i64 } else { ctx.local_offset_secs };

    match crate::strptime::timegm_utc(&tm) {
        Some(ts) => ExtractOutcome::Found(ts - offset),
        None => ExtractOutcome::NotFound,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn outcome_ts(o: ExtractOutcome) -> Option<i64> {
        match o {
            ExtractOutcome::Found(ts) => Some(ts),
            ExtractOutcome::NotFound => None,
            ExtractOutcome::Error(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn direct_default_format() {
        let ctx = ParserContext::new("default", 0).unwrap();
        let ts = outcome_ts(extract_timestamp(b"2021-01-01 00:00:20 c", &ctx));
        assert_eq!(ts, Some(1609459220));
    }

    #[test]
    fn direct_no_match_is_not_found() {
        let ctx = ParserContext::new("default", 0).unwrap();
        assert!(matches!(extract_timestamp(b"no date here", &ctx), ExtractOutcome::NotFound));
    }

    #[test]
    fn direct_invalid_utf8_is_not_found() {
        let ctx = ParserContext::new("default", 0).unwrap();
        let bytes: &[u8] = &[0xFF, 0xFE, b'x'];
        assert!(matches!(extract_timestamp(bytes, &ctx), ExtractOutcome::NotFound));
    }

    #[test]
    fn tskv_timestamp_short_circuits() {
        let ctx = ParserContext::new("tskv", 123).unwrap();
        let ts = outcome_ts(extract_timestamp(b"unixtime=1700000000 payload", &ctx));
        assert_eq!(ts, Some(1700000000));
    }

    #[test]
    fn direct_uses_captured_timezone_over_local() {
        let ctx = ParserContext::new("iso", 3600).unwrap();
        let ts = outcome_ts(extract_timestamp(b"2021-01-01T00:00:00+02:00", &ctx));
        assert_eq!(ts, Some(1609459200 - 2 * 3600));
    }

    #[test]
    fn direct_falls_back_to_local_offset_without_timezone_group() {
        let ctx = ParserContext::new("default", 3600).unwrap();
        let ts = outcome_ts(extract_timestamp(b"2021-01-01 00:00:00 x", &ctx));
        assert_eq!(ts, Some(1609459200 - 3600));
    }

    #[test]
    fn syslog_month_name_double_space_day_and_local_offset() {
        let ctx = ParserContext::new("syslog", 0).unwrap();
        assert!(!ctx.fallback);
        let ts = outcome_ts(extract_timestamp(b"Jan  5 10:11:12 host msg", &ctx));
        assert!(ts.is_some());
    }

    #[test]
    fn fallback_format_uses_strptime() {
        // %a forces fallback; verify the whole-match reparse path works end to end.
        let ctx = ParserContext::new("%a %b %d %H:%M:%S %Y", 0).unwrap();
        assert!(ctx.fallback);
        let ts = outcome_ts(extract_timestamp(b"Mon Jan 04 10:11:12 2021", &ctx));
        assert!(ts.is_some());
    }
}
