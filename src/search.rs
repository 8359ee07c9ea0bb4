//! Binary searcher: find the earliest line whose timestamp is `>= T`.

use crate::context::ParserContext;
use crate::error::TgError;
use crate::scan::{forward_scan, ScanOutcome};

pub enum SearchOutcome {
    Found(usize),
    NotFound,
    Error(TgError),
}

/// Find the position of the earliest line with timestamp `>= search`, within `[lbound, size)`.
///
/// `mid` is deliberately recomputed as `lbound + (mid - lbound) / 2` on the `NotFound` branch (the
/// midpoint of the *old* `[lbound, mid)`, not of the current `[lbound, ubound)`) -- this is what
/// guarantees positions with no parseable timestamp are eventually excluded and the search
/// terminates.
pub fn binary_search(data: &[u8], size: usize, ctx: &ParserContext, search: i64, lbound: usize) -> SearchOutcome {
    let mut l = lbound;
    let mut u = size;
    let mut mid = l + (u - l) / 2;
    let mut result = SearchOutcome::NotFound;

    while l != mid {
        match forward_scan(data, u, mid, ctx) {
            ScanOutcome::Found { start, end, timestamp } => {
                if timestamp < search {
                    l = end;
                    if l != u {
                        l += 1;
                    }
                    mid = u;
                } else {
                    result = SearchOutcome::Found(start);
                    u = start;
                    mid = u;
                }
            },
            ScanOutcome::NotFound => u = mid,
            ScanOutcome::Unbounded => break,
            ScanOutcome::Error(e) => return SearchOutcome::Error(e),
        }
        mid = l + (mid - l) / 2;
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;

    const DATA: &[u8] = b"2021-01-01 00:00:00 a\n\
2021-01-01 00:00:10 b\n\
2021-01-01 00:00:20 c\n\
2021-01-01 00:00:30 d\n\
2021-01-01 00:00:40 e\n\
2021-01-01 00:00:50 f\n\
2021-01-01 00:01:00 g\n\
2021-01-01 00:01:10 h\n\
2021-01-01 00:01:20 i\n";

    fn ctx() -> ParserContext {
        ParserContext::new("default", 0).unwrap()
    }

    fn line_at(pos: usize) -> &'static [u8] {
        let rest = &DATA[pos..];
        let end = rest.iter().position(|&b| b == b'\n').unwrap();
        &rest[..end]
    }

    #[test]
    fn finds_exact_boundary() {
        let ctx = ctx();
        // 00:00:20 is line c's timestamp exactly.
        let ts = 1609459200 + 20;
        match binary_search(DATA, DATA.len(), &ctx, ts, 0) {
            SearchOutcome::Found(pos) => assert_eq!(line_at(pos), b"2021-01-01 00:00:20 c"),
            _ => panic!("expected Found"),
        }
    }

    #[test]
    fn finds_leftmost_when_between_lines() {
        let ctx = ctx();
        // Between d (…30) and e (…40): earliest line >= this timestamp is e.
        let ts = 1609459200 + 35;
        match binary_search(DATA, DATA.len(), &ctx, ts, 0) {
            SearchOutcome::Found(pos) => assert_eq!(line_at(pos), b"2021-01-01 00:00:40 e"),
            _ => panic!("expected Found"),
        }
    }

    #[test]
    fn not_found_past_end() {
        let ctx = ctx();
        let ts = 1609459200 + 1000;
        assert!(matches!(binary_search(DATA, DATA.len(), &ctx, ts, 0), SearchOutcome::NotFound));
    }

    #[test]
    fn found_at_very_start() {
        let ctx = ctx();
        let ts = 1609459200 - 100;
        match binary_search(DATA, DATA.len(), &ctx, ts, 0) {
            SearchOutcome::Found(pos) => assert_eq!(pos, 0),
            _ => panic!("expected Found"),
        }
    }
}
