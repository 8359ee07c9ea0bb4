//! Format-to-regex compiler: translates a `strptime`-style format string into a PCRE-flavoured
//! regex plus the metadata the extractor needs to read it back.

use crate::error::{TgError, TgResult};

/// One entry of the static format alias table. `alias` and `format` are mutually exclusive: an
/// alias resolves to another named entry in exactly one hop.
struct FormatEntry {
    name: &'static str,
    alias: Option<&'static str>,
    format: Option<&'static str>,
}

/// Built-in named formats. Order matches the original tool's `--help` listing.
const FORMATS: &[FormatEntry] = &[
    FormatEntry { name: "default", alias: None, format: Some("%Y-%m-%d %H:%M:%S") },
    FormatEntry { name: "iso", alias: None, format: Some("%Y-%m-%dT%H:%M:%S%z") },
    FormatEntry { name: "common", alias: None, format: Some("%d/%b/%Y:%H:%M:%S %z") },
    FormatEntry { name: "syslog", alias: None, format: Some("%b %d %H:%M:%S") },
    FormatEntry { name: "tskv", alias: None, format: Some("unixtime=%s") },
    FormatEntry { name: "apache", alias: Some("common"), format: None },
    FormatEntry { name: "nginx", alias: Some("common"), format: None },
];

/// Resolve a format name (or literal format string) to the format string to compile.
///
/// A name resolves through at most one alias hop. Anything that isn't a recognized name is
/// returned unchanged, on the assumption that the caller passed a literal `strptime` format.
pub fn resolve_format(name_or_format: &str) -> &str {
    for entry in FORMATS {
        if entry.name == name_or_format {
            return match entry.alias {
                Some(alias) => resolve_format(alias),
                None => entry.format.expect("format entry has alias xor format"),
            };
        }
    }
    name_or_format
}

/// List built-in format names and their definitions, for `--help`.
pub fn list_formats() -> Vec<(&'static str, String)> {
    FORMATS.iter()
           .map(|e| {
               let desc = match e.alias {
                   Some(alias) => format!("alias for '{alias}'"),
                   None => format!("'{}'", e.format.unwrap()),
               };
               (e.name, desc)
           })
           .collect()
}

/// The nine kinds of named capture a compiled format can expose. Kept as a closed enum rather
/// than a string so `GroupIndex` can be a flat, hash-free record on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Year,
    Month,
    MonthT,
    Day,
    Hour,
    Minute,
    Second,
    Timezone,
    Timestamp,
}
pub const ALL_KINDS: [Kind; 9] = [Kind::Year,
                                   Kind::Month,
                                   Kind::MonthT,
                                   Kind::Day,
                                   Kind::Hour,
                                   Kind::Minute,
                                   Kind::Second,
                                   Kind::Timezone,
                                   Kind::Timestamp];

impl Kind {
    fn tag(self) -> &'static str {
        match self {
            Kind::Year => "year",
            Kind::Month => "month",
            Kind::MonthT => "month_t",
            Kind::Day => "day",
            Kind::Hour => "hour",
            Kind::Minute => "minute",
            Kind::Second => "second",
            Kind::Timezone => "timezone",
            Kind::Timestamp => "timestamp",
        }
    }
}

/// Per-kind occurrence counts accumulated while walking the format string. The *upstream* PCRE
/// implementation lets duplicate group names coexist (`PCRE_DUPNAMES`) and only uses the counts to
/// decide `fallback`; Rust's `regex` crate rejects duplicate capture names outright, so this
/// compiler always mints a unique name per occurrence (`year_1`, `year_2`, ...) and uses these
/// counts both for the fallback decision (unchanged from the original) and to know which unique
/// name is "the" occurrence when count == 1.
#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    year: u32,
    month: u32,
    month_t: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    timezone: u32,
    timestamp: u32,
}
impl Counts {
    fn get(&self, kind: Kind) -> u32 {
        match kind {
            Kind::Year => self.year,
            Kind::Month => self.month,
            Kind::MonthT => self.month_t,
            Kind::Day => self.day,
            Kind::Hour => self.hour,
            Kind::Minute => self.minute,
            Kind::Second => self.second,
            Kind::Timezone => self.timezone,
            Kind::Timestamp => self.timestamp,
        }
    }
    fn bump(&mut self, kind: Kind) -> u32 {
        let slot = match kind {
            Kind::Year => &mut self.year,
            Kind::Month => &mut self.month,
            Kind::MonthT => &mut self.month_t,
            Kind::Day => &mut self.day,
            Kind::Hour => &mut self.hour,
            Kind::Minute => &mut self.minute,
            Kind::Second => &mut self.second,
            Kind::Timezone => &mut self.timezone,
            Kind::Timestamp => &mut self.timestamp,
        };
        *slot += 1;
        *slot
    }
}

/// Result of translating a format string: the regex pattern text plus the metadata needed to
/// finish compiling it.
pub struct CompiledPattern {
    pub pattern: String,
    pub fallback: bool,
    pub format_has_timezone: bool,
    counts: Counts,
}
impl CompiledPattern {
    /// Unique regex group name for the single occurrence of `kind`, if it occurs exactly once.
    pub fn group_name(&self, kind: Kind) -> Option<String> {
        if self.counts.get(kind) == 1 {
            Some(format!("{}_1", kind.tag()))
        } else {
            None
        }
    }
}

const ESCAPE: &[u8] = b"^$|()[]{}.*+?\\";

/// Translate `format` into a regex pattern. This collapses the original's two-pass
/// length-then-emit design (necessary there to size a manually-managed C buffer) into a single
/// pass over a growable `String`; the per-kind counts and the `fallback`/`format_has_timezone`
/// flags are identical to what a second pass would recompute, so determinism is preserved by
/// construction rather than by re-running the translation twice.
pub fn compile_format(format: &str) -> TgResult<CompiledPattern> {
    let mut pattern = String::with_capacity(format.len() * 2);
    let mut fallback = false;
    let mut counts = Counts::default();
    translate(format, &mut pattern, &mut fallback, &mut counts)?;

    if counts.year > 1
       || counts.month > 1
       || counts.month_t > 1
       || counts.day > 1
       || counts.hour > 1
       || counts.minute > 1
       || counts.second > 1
       || counts.timezone > 1
       || counts.timestamp > 1
       || (counts.month + counts.month_t) > 1
       || (counts.timestamp > 0
           && (counts.year + counts.month + counts.month_t + counts.day + counts.hour + counts.minute + counts.second) > 1)
    {
        fallback = true;
    }

    let format_has_timezone = counts.timezone > 0;

    Ok(CompiledPattern { pattern, fallback, format_has_timezone, counts })
}

/// Emit a named capturing group for `kind`, minting a fresh unique name per occurrence.
fn capture(pattern: &mut String, counts: &mut Counts, kind: Kind, body: &str) {
    let n = counts.bump(kind);
    pattern.push_str("(?P<");
    pattern.push_str(kind.tag());
    pattern.push('_');
    pattern.push_str(&n.to_string());
    pattern.push('>');
    pattern.push_str(body);
    pattern.push(')');
}

/// Recursive core of the translator (mirrors `tg_strptime_regex_nsc`). Compound directives
/// (`%c`, `%D`, `%r`, `%R`, `%T`, `%X`, `%x`, `%F`) recurse into their expansion.
fn translate(format: &str, pattern: &mut String, fallback: &mut bool, counts: &mut Counts) -> TgResult<()> {
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            if c.is_whitespace() {
                // A literal space in a strptime format matches zero or more whitespace characters
                // in the input (POSIX strptime semantics) -- e.g. the "syslog" built-in format's
                // single separator space must still match the double space real syslog output
                // uses to pad single-digit days. Keeping the regex and fallback (strptime) paths
                // agreeing on this is also why the direct and reparsed outcomes must match.
                pattern.push_str("\\s*");
            } else if c.is_ascii() && ESCAPE.contains(&(c as u8)) {
                pattern.push('\\');
                pattern.push(c);
            } else {
                pattern.push(c);
            }
            continue;
        }

        let directive = match chars.next() {
            Some(d) => d,
            None => return Err(TgError::BadFormat("unexpected format char '%' at end of format string".into())),
        };

        match directive {
            '%' => pattern.push('%'),
            'a' | 'A' => {
                pattern.push_str("(Mon|Monday|Tue|Tuesday|Wed|Wednesday|Thu|Thursday|Fri|Friday|Sat|Saturday|Sun|Sunday)");
                *fallback = true;
            },
            'b' | 'B' | 'h' => {
                capture(pattern,
                        counts,
                        Kind::MonthT,
                        "Jan|January|Feb|February|Mar|March|Apr|April|May|Jun|June|Jul|July|Aug|August|Sep|September|Oct|October|Nov|November|Dec|December");
            },
            'c' => translate("%x %X", pattern, fallback, counts)?,
            'C' => {
                pattern.push_str("\\d{1,2}");
                *fallback = true;
            },
            'd' | 'e' => capture(pattern, counts, Kind::Day, "[1-2][0-9]|3[0-1]|0?[1-9]"),
            'D' => translate("%m/%d/%y", pattern, fallback, counts)?,
            'H' => capture(pattern, counts, Kind::Hour, "1[0-9]|2[0-3]|0?[0-9]"),
            'I' => {
                pattern.push_str("1[0-2]|0?[1-9]");
                *fallback = true;
            },
            'j' => {
                pattern.push_str("[1-2][0-9][0-9]|3[0-5][0-9]|36[0-6]|0?[1-9][0-9]|0{0,2}[1-9]");
                *fallback = true;
            },
            'm' => capture(pattern, counts, Kind::Month, "1[0-2]|0?[1-9]"),
            'M' => capture(pattern, counts, Kind::Minute, "[1-5][0-9]|0?[0-9]"),
            'n' | 't' => pattern.push_str("\\s"),
            'p' => {
                pattern.push_str("(AM|PM)");
                *fallback = true;
            },
            'r' => translate("%I:%M:%S %p", pattern, fallback, counts)?,
            'R' => translate("%H:%M", pattern, fallback, counts)?,
            'S' => capture(pattern, counts, Kind::Second, "[1-5][0-9]|60|0?[0-9]"),
            'T' | 'X' => translate("%H:%M:%S", pattern, fallback, counts)?,
            'U' | 'W' => {
                pattern.push_str("[1-4][0-9]|5[0-3]|0?[0-9]");
                *fallback = true;
            },
            'V' => {
                pattern.push_str("[1-4][0-9]|5[0-3]|0?[1-9]");
                *fallback = true;
            },
            'w' => {
                pattern.push_str("[0-6]");
                *fallback = true;
            },
            'u' => {
                pattern.push_str("[1-7]");
                *fallback = true;
            },
            'x' | 'F' => translate("%Y-%m-%d", pattern, fallback, counts)?,
            'y' | 'g' => {
                pattern.push_str("\\d{1,2}");
                *fallback = true;
            },
            'Y' => capture(pattern, counts, Kind::Year, "\\d{4}"),
            'G' => {
                pattern.push_str("\\d{4}");
                *fallback = true;
            },
            'z' => capture(pattern,
                            counts,
                            Kind::Timezone,
                            "(\\+|-)\\d{2}:?\\d{2}|UT|UTC|GMT|EST|EDT|CST|CDT|MST|MDT|PST|PDT|[A-Z]"),
            'Z' => {
                capture(pattern, counts, Kind::Timezone, "[A-Za-z0-9_+\\-/]{3,33}");
                *fallback = true;
            },
            's' => capture(pattern, counts, Kind::Timestamp, "\\d{1,20}"),
            'O' | 'E' => {
                return Err(TgError::BadFormat("'O' and 'E' modifiers not supported".into()));
            },
            other => return Err(TgError::BadFormat(format!("unexpected format char '{other}'"))),
        }
    }
    Ok(())
}
