//! Thin FFI wrapper around the platform's `strptime(3)`/`timegm(3)`, used only by the fallback
//! path: when the compiled regex's named captures aren't trusted, the matched substring is handed
//! back to the libc parser with the original format string.

use std::ffi::CString;

extern "C" {
    fn strptime(s: *const libc::c_char, format: *const libc::c_char, tm: *mut libc::tm) -> *mut libc::c_char;
    fn timegm(tm: *mut libc::tm) -> libc::time_t;
}

/// Run the platform `strptime` over `s` with `format`. Returns the populated `libc::tm` on
/// success, `None` if `strptime` could not match the whole conversion (mirrors `tg_strptime`'s use
/// of the return value, not the matched offset: a partial in-string match still counts, exactly as
/// glibc's `strptime` behaves).
pub fn parse(s: &str, format: &str) -> Option<libc::tm> {
    let cs = CString::new(s).ok()?;
    let cf = CString::new(format).ok()?;
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    let res = unsafe { strptime(cs.as_ptr(), cf.as_ptr(), &mut tm) };
    if res.is_null() {
        None
    } else {
        Some(tm)
    }
}

/// Convert a broken-down time, interpreted as UTC, to epoch seconds. Returns `None` on the
/// sentinel failure value (-1), matching `tg_strptime_re`'s `timestamp == -1` check.
pub fn timegm_utc(tm: &libc::tm) -> Option<i64> {
    let mut tm = *tm;
    let ts = unsafe { timegm(&mut tm) };
    if ts == -1 {
        None
    } else {
        Some(ts as i64)
    }
}
