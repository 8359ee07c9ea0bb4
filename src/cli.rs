//! CLI surface: argument parsing and datetime-argument resolution.

use clap::{crate_version, App, Arg, ArgMatches};
use time::UtcOffset;

use crate::format::list_formats;
use crate::msg::error_prefix;

/// Parsed, fully-resolved invocation: files plus the resolved `[start, stop)` window and format.
pub struct Invocation {
    pub files: Vec<String>,
    pub format: String,
    pub start: i64,
    pub stop: i64,
}

const HEURISTIC_FORMATS: &[&str] =
    &["default", "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

pub fn build_app() -> App<'static, 'static> {
    App::new("timegrep")
        .version(crate_version!())
        .about("Extract a time window of lines from time-ordered log files by binary search.")
        .after_help(&*format_list_help())
        .arg(Arg::with_name("format")
             .short("e")
             .long("format")
             .value_name("name-or-format")
             .takes_value(true)
             .default_value("default")
             .help("Built-in format name or literal strptime-style format."))
        .arg(Arg::with_name("start")
             .short("f")
             .long("start")
             .value_name("datetime")
             .takes_value(true)
             .help("Inclusive lower bound. Default: now - offset."))
        .arg(Arg::with_name("stop")
             .short("t")
             .long("stop")
             .value_name("datetime")
             .takes_value(true)
             .help("Exclusive upper bound. Default: now."))
        .arg(Arg::with_name("seconds")
             .short("s")
             .long("seconds")
             .value_name("n")
             .takes_value(true)
             .help("Add n seconds to the default-start offset."))
        .arg(Arg::with_name("minutes")
             .short("m")
             .long("minutes")
             .value_name("n")
             .takes_value(true)
             .help("Add n minutes to the default-start offset."))
        .arg(Arg::with_name("hours")
             .short("h")
             .long("hours")
             .value_name("n")
             .takes_value(true)
             .help("Add n hours to the default-start offset."))
        .arg(Arg::with_name("files").multiple(true).value_name("file").help("Log files to search; reads stdin if none given."))
        .help_short("?")
        .version_short("v")
        .help_message("Show usage and the list of built-in formats.")
        .version_message("Print version and exit.")
}

fn format_list_help() -> String {
    let mut s = String::from("Built-in formats:\n");
    for (name, format) in list_formats() {
        s.push_str(&format!("  {name:<8} {format}\n"));
    }
    s
}

/// Resolve a fully-parsed [`Invocation`] from already-matched arguments and the process's local
/// offset. Exits the process on any argument that fails to parse (see [`value_opt`]).
pub fn resolve(matches: &ArgMatches, local_offset: UtcOffset) -> Invocation {
    let format = matches.value_of("format").unwrap_or("default").to_string();

    let seconds = value_opt(matches, "seconds", parse_non_negative).unwrap_or(0);
    let minutes = value_opt(matches, "minutes", parse_non_negative).unwrap_or(0);
    let hours = value_opt(matches, "hours", parse_non_negative).unwrap_or(0);
    let offset = seconds + 60 * minutes + 3600 * hours;

    let now = now_epoch();
    let stop = value_opt(matches, "stop", |s| parse_datetime(s, &format, local_offset)).unwrap_or(now);
    let start = value_opt(matches, "start", |s| parse_datetime(s, &format, local_offset)).unwrap_or(stop - offset);

    let files = matches.values_of("files").map(|v| v.map(String::from).collect()).unwrap_or_default();

    Invocation { files, format, start, stop }
}

fn now_epoch() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}

fn parse_non_negative(s: &str) -> Result<i64, String> {
    s.parse::<i64>().map_err(|_| "must be a non-negative integer".to_string()).and_then(|n| {
        if n < 0 {
            Err("must be a non-negative integer".to_string())
        } else {
            Ok(n)
        }
    })
}

/// Parse a datetime argument with the selected format first, then a heuristic cascade of
/// common bare-date shapes.
fn parse_datetime(s: &str, format: &str, local_offset: UtcOffset) -> Result<i64, String> {
    if let Ok(ts) = try_format(s, format, local_offset) {
        return Ok(ts);
    }
    for candidate in HEURISTIC_FORMATS {
        if let Ok(ts) = try_format(s, candidate, local_offset) {
            return Ok(ts);
        }
    }
    Err("couldn't parse as a datetime in the selected format or any heuristic format".to_string())
}

fn try_format(s: &str, format: &str, local_offset: UtcOffset) -> Result<i64, ()> {
    let ctx = crate::context::ParserContext::new(format, local_offset.whole_seconds() as i64).map_err(|_| ())?;
    match crate::extract::extract_timestamp(s.as_bytes(), &ctx) {
        crate::extract::ExtractOutcome::Found(ts) => Ok(ts),
        _ => Err(()),
    }
}

/// Parse and return an optional argument, exiting the process on a parse failure but returning
/// `None` when the argument was not given at all.
pub fn value_opt<T, P>(matches: &ArgMatches, name: &str, parse: P) -> Option<T>
    where P: FnOnce(&str) -> Result<T, String>
{
    let s = matches.value_of(name)?;
    match parse(s) {
        Ok(v) => Some(v),
        Err(e) => exit_invalid(name, s, &e),
    }
}

/// A bad argument value is treated as an unrecoverable error and exits `2`, same as the other
/// unrecoverable error kinds -- unlike clap's own usage errors (missing/unknown flag), which exit
/// `1` and would otherwise collide with the "no match found" exit code.
fn exit_invalid(name: &str, value: &str, reason: &str) -> ! {
    eprintln!("{} invalid argument '--{name} {value}': {reason}", error_prefix());
    std::process::exit(2)
}
