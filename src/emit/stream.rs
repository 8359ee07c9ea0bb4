//! Stream emitter: buffered sequential scan for non-seekable input.

use std::io::{Read, Write};

use crate::context::ParserContext;
use crate::error::TgResult;
use crate::extract::{extract_timestamp, ExtractOutcome};
use crate::line::memchr;

/// Scan `input` sequentially, writing lines whose timestamp falls in `[start, stop)` to `out`.
/// Returns `Ok(true)` if any line was emitted.
///
/// Unlike the file emitter this does not require monotonic timestamps to produce *some* output,
/// but only matches the binary-search semantics for monotone input.
pub fn stream_timegrep<R: Read, W: Write>(mut input: R, ctx: &ParserContext, start: i64, stop: i64,
                                           out: &mut W, chunk: usize)
                                           -> TgResult<bool> {
    let mut data: Vec<u8> = vec![0u8; chunk * 2];
    let mut lbound = 0usize;
    let mut ubound = 0usize;
    let mut streaming = false;

    loop {
        let nl = match next_line_end(&mut input, &mut data, lbound, &mut ubound, chunk)? {
            Some(nl) => nl,
            None => break,
        };

        match extract_timestamp(&data[lbound..nl], ctx) {
            ExtractOutcome::Error(e) => return Err(e),
            ExtractOutcome::Found(ts) => {
                if ts >= stop {
                    break;
                }
                if !streaming && ts >= start {
                    streaming = true;
                }
            },
            ExtractOutcome::NotFound => {},
        }

        if streaming {
            out.write_all(&data[lbound..=nl])?;
        }
        lbound = nl + 1;

        if ubound - lbound < lbound {
            data.copy_within(lbound..ubound, 0);
            ubound -= lbound;
            lbound = 0;
        }
    }

    Ok(streaming)
}

/// Ensure a complete line (terminated by `'\n'`) is available at or after `lbound`, growing the
/// buffer geometrically (`+2*chunk`) as needed, and return the position of its delimiter.
/// Returns `None` on EOF with no further complete line available.
fn next_line_end<R: Read>(input: &mut R, data: &mut Vec<u8>, lbound: usize, ubound: &mut usize, chunk: usize)
                           -> TgResult<Option<usize>> {
    loop {
        if let Some(p) = memchr(b'\n', &data[lbound..*ubound]) {
            return Ok(Some(lbound + p));
        }

        if data.len() - *ubound < chunk {
            data.resize(data.len() + chunk * 2, 0);
        }

        let n = input.read(&mut data[*ubound..*ubound + chunk])?;
        if n == 0 {
            return Ok(None);
        }
        *ubound += n;
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;
    use crate::context::ParserContext;

    const NINE_LINES: &str = "2021-01-01 00:00:00 a\n\
2021-01-01 00:00:10 b\n\
2021-01-01 00:00:20 c\n\
2021-01-01 00:00:30 d\n\
2021-01-01 00:00:40 e\n\
2021-01-01 00:00:50 f\n\
2021-01-01 00:01:00 g\n\
2021-01-01 00:01:10 h\n\
2021-01-01 00:01:20 i\n";

    #[test]
    fn matches_file_emitter_for_monotone_input() {
        let ctx = ParserContext::new("default", 0).unwrap();
        let base = 1609459200;
        let mut out = Vec::new();
        let found =
            stream_timegrep(Cursor::new(NINE_LINES.as_bytes()), &ctx, base + 20, base + 50, &mut out, 8).unwrap();
        assert!(found);
        assert_eq!(out, b"2021-01-01 00:00:20 c\n2021-01-01 00:00:30 d\n2021-01-01 00:00:40 e\n");
    }

    #[test]
    fn no_match_returns_false() {
        let ctx = ParserContext::new("default", 0).unwrap();
        let base = 1609459200;
        let mut out = Vec::new();
        let found =
            stream_timegrep(Cursor::new(NINE_LINES.as_bytes()), &ctx, base + 120, base + 180, &mut out, 8).unwrap();
        assert!(!found);
        assert!(out.is_empty());
    }

    #[test]
    fn grows_buffer_across_small_chunks() {
        let ctx = ParserContext::new("default", 0).unwrap();
        let base = 1609459200;
        let mut out = Vec::new();
        // chunk smaller than a single line forces geometric growth.
        let found = stream_timegrep(Cursor::new(NINE_LINES.as_bytes()), &ctx, base, base + 1000, &mut out, 4).unwrap();
        assert!(found);
        assert_eq!(out, NINE_LINES.as_bytes());
    }

    #[test]
    fn stops_at_first_line_past_stop() {
        let ctx = ParserContext::new("default", 0).unwrap();
        let base = 1609459200;
        let mut out = Vec::new();
        stream_timegrep(Cursor::new(NINE_LINES.as_bytes()), &ctx, base, base + 21, &mut out, 16).unwrap();
        assert_eq!(out, b"2021-01-01 00:00:00 a\n2021-01-01 00:00:10 b\n2021-01-01 00:00:20 c\n");
    }
}
