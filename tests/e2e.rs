//! End-to-end scenarios against a built binary.

use std::io::Write;

use assert_cmd::prelude::*;
use escargot::CargoBuild;
use lazy_static::lazy_static;
use tempfile::NamedTempFile;

lazy_static! {
    static ref BIN: escargot::CargoRun =
        CargoBuild::new().bin("timegrep").current_release().run().expect("failed to build timegrep");
}

const NINE_LINES: &str = "2021-01-01 00:00:00 a\n\
2021-01-01 00:00:10 b\n\
2021-01-01 00:00:20 c\n\
2021-01-01 00:00:30 d\n\
2021-01-01 00:00:40 e\n\
2021-01-01 00:00:50 f\n\
2021-01-01 00:01:00 g\n\
2021-01-01 00:01:10 h\n\
2021-01-01 00:01:20 i\n";

fn fixture() -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(NINE_LINES.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn emits_middle_window_and_exits_zero() {
    let f = fixture();
    let assert = BIN.command()
                     .args(["-f", "2021-01-01 00:00:20", "-t", "2021-01-01 00:00:50"])
                     .arg(f.path())
                     .assert();
    assert.success().stdout("2021-01-01 00:00:20 c\n2021-01-01 00:00:30 d\n2021-01-01 00:00:40 e\n");
}

#[test]
fn no_match_exits_one_with_no_output() {
    let f = fixture();
    let assert = BIN.command()
                     .args(["-f", "2022-01-01 00:00:00", "-t", "2022-01-02 00:00:00"])
                     .arg(f.path())
                     .assert();
    assert.code(1).stdout("");
}

#[test]
fn bad_format_exits_two() {
    let f = fixture();
    let assert = BIN.command().args(["-e", "%Q"]).arg(f.path()).assert();
    assert.code(2);
}

#[test]
fn bad_start_argument_exits_two_not_one() {
    let f = fixture();
    let assert = BIN.command().args(["-f", "not-a-date-at-all"]).arg(f.path()).assert();
    assert.code(2).stderr(predicates::str::contains("ERROR:"));
}

#[test]
fn syslog_format_matches_double_space_day() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "Jan  5 10:11:12 host app[1]: boot").unwrap();
    f.flush().unwrap();

    let assert = BIN.command()
                     .args(["-e", "syslog", "-f", "2000-01-01 00:00:00", "-t", "2100-01-01 00:00:00"])
                     .arg(f.path())
                     .assert();
    assert.success().stdout(predicates::str::contains("host app[1]: boot"));
}

#[test]
fn tskv_format_extracts_unixtime() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "unixtime=1609459230\tmsg=hello").unwrap();
    f.flush().unwrap();

    let assert = BIN.command()
                     .args(["-e", "tskv", "-f", "2021-01-01 00:00:20", "-t", "2021-01-01 00:00:40"])
                     .arg(f.path())
                     .assert();
    assert.success().stdout(predicates::str::contains("unixtime=1609459230"));
}

#[test]
fn heuristic_cascade_accepts_bare_date() {
    let f = fixture();
    let assert = BIN.command().args(["-f", "2021-01-01", "-t", "2021-01-02"]).arg(f.path()).assert();
    assert.success().stdout(NINE_LINES);
}

#[test]
fn stdin_stream_fallback_matches_file_output() {
    let assert = BIN.command()
                     .args(["-f", "2021-01-01 00:00:20", "-t", "2021-01-01 00:00:50"])
                     .write_stdin(NINE_LINES)
                     .assert();
    assert.success().stdout("2021-01-01 00:00:20 c\n2021-01-01 00:00:30 d\n2021-01-01 00:00:40 e\n");
}

#[test]
fn version_flag_exits_zero() {
    let assert = BIN.command().arg("--version").assert();
    assert.success();
}
