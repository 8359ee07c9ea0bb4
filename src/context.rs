//! Parser context: the immutable-after-construction bundle a compiled format resolves into.

use regex::Regex;

use crate::error::{TgError, TgResult};
use crate::format::{compile_format, resolve_format, Kind};

/// Capture-group index (or absence) for each of the nine kinds, stored as a flat record rather
/// than a map so the hot extraction path never hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupIndex {
    pub year: Option<usize>,
    pub month: Option<usize>,
    pub month_t: Option<usize>,
    pub day: Option<usize>,
    pub hour: Option<usize>,
    pub minute: Option<usize>,
    pub second: Option<usize>,
    pub timezone: Option<usize>,
    pub timestamp: Option<usize>,
}
impl GroupIndex {
    fn set(&mut self, kind: Kind, idx: Option<usize>) {
        match kind {
            Kind::Year => self.year = idx,
            Kind::Month => self.month = idx,
            Kind::MonthT => self.month_t = idx,
            Kind::Day => self.day = idx,
            Kind::Hour => self.hour = idx,
            Kind::Minute => self.minute = idx,
            Kind::Second => self.second = idx,
            Kind::Timezone => self.timezone = idx,
            Kind::Timestamp => self.timestamp = idx,
        }
    }
}

/// Immutable, read-only-during-search parser context. Owns the compiled regex; constructed once
/// before any search and released at process end.
pub struct ParserContext {
    pub re: Regex,
    pub group_index: GroupIndex,
    pub fallback: bool,
    pub format: String,
    pub format_has_timezone: bool,
    /// Seconds east of UTC, sampled once from the system (or injected by a test). Carried on the
    /// context instead of a hidden global so tests can construct a context with a fixed offset.
    pub local_offset_secs: i64,
}

impl ParserContext {
    /// Build a parser context from a format name or literal format string.
    pub fn new(name_or_format: &str, local_offset_secs: i64) -> TgResult<Self> {
        let format = resolve_format(name_or_format).to_string();
        let compiled = compile_format(&format)?;

        let re = Regex::new(&compiled.pattern).map_err(|e| TgError::RegexEngine(e.to_string()))?;

        let mut group_index = GroupIndex::default();
        for kind in crate::format::ALL_KINDS {
            let idx = compiled.group_name(kind).and_then(|name| re.capture_names().position(|n| n == Some(name.as_str())));
            group_index.set(kind, idx);
        }

        Ok(ParserContext { re,
                            group_index,
                            fallback: compiled.fallback,
                            format,
                            format_has_timezone: compiled.format_has_timezone,
                            local_offset_secs })
    }
}
