//! Forward scanner: find the next line with a parseable timestamp.

use crate::context::ParserContext;
use crate::error::TgError;
use crate::extract::{extract_timestamp, ExtractOutcome};
use crate::line::{locate_line, LineLocation};

/// Outcome of a forward scan, i.e. a binary-search probe.
pub enum ScanOutcome {
    Found { start: usize, end: usize, timestamp: i64 },
    NotFound,
    /// The whole remaining buffer is a single unterminated line.
    Unbounded,
    Error(TgError),
}

/// Scan forward from `position` (inclusive) up to `ubound` (exclusive) for the next line whose
/// timestamp can be extracted.
pub fn forward_scan(data: &[u8], ubound: usize, mut position: usize, ctx: &ParserContext) -> ScanOutcome {
    while position < ubound {
        match locate_line(data, position) {
            LineLocation::OnDelimiter => position += 1,
            LineLocation::Unbounded => return ScanOutcome::Unbounded,
            LineLocation::Found { start, end } => {
                match extract_timestamp(&data[start..end], ctx) {
                    ExtractOutcome::Found(timestamp) => return ScanOutcome::Found { start, end, timestamp },
                    ExtractOutcome::NotFound => position = end + 1,
                    ExtractOutcome::Error(e) => return ScanOutcome::Error(e),
                }
            },
        }
    }
    ScanOutcome::NotFound
}
