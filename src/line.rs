//! Line locator: find the bounds of the line containing a byte offset.

/// Outcome of locating a line at a given position.
#[derive(Debug, PartialEq, Eq)]
pub enum LineLocation {
    /// `position` landed exactly on the `'\n'` delimiter.
    OnDelimiter,
    /// Ordinary line, bounds `[start, end)` not including the delimiter.
    Found { start: usize, end: usize },
    /// No newline exists anywhere in the buffer; it is a single unterminated line.
    Unbounded,
}

/// Find the bounds of the line containing byte `position` in `data`.
pub fn locate_line(data: &[u8], position: usize) -> LineLocation {
    if data[position] == b'\n' {
        return LineLocation::OnDelimiter;
    }

    let start = memrchr(b'\n', &data[..position]).map(|i| i + 1).unwrap_or(0);
    let end = memchr(b'\n', &data[position..]).map(|i| position + i).unwrap_or(data.len());

    if start == 0 && end == data.len() && memchr(b'\n', data).is_none() {
        return LineLocation::Unbounded;
    }

    LineLocation::Found { start, end }
}

pub(crate) fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

pub(crate) fn memrchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().rposition(|&b| b == needle)
}
