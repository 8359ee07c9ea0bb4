use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::sync::OnceLock;

use log::warn;
use memmap2::Mmap;
use time::UtcOffset;

use timegrep::cli::{build_app, resolve};
use timegrep::context::ParserContext;
use timegrep::emit::file::file_timegrep;
use timegrep::emit::stream::stream_timegrep;
use timegrep::emit::DEFAULT_CHUNK;
use timegrep::error::TgError;
use timegrep::msg::error_prefix;

static LOCAL_TZ_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Sample the system's local offset once, at process startup.
fn local_offset() -> UtcOffset {
    *LOCAL_TZ_OFFSET.get_or_init(|| {
                        UtcOffset::current_local_offset().unwrap_or_else(|e| {
                                                              warn!("falling back to UTC: {e}");
                                                              UtcOffset::UTC
                                                          })
                    })
}

fn main() {
    env_logger::init();

    let matches = build_app().get_matches();
    let offset = local_offset();
    let invocation = resolve(&matches, offset);

    let ctx = match ParserContext::new(&invocation.format, offset.whole_seconds() as i64) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{} {e}", error_prefix());
            std::process::exit(2);
        },
    };

    let stdout = stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = run(&invocation.files, &ctx, invocation.start, invocation.stop, &mut out);

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {e}", error_prefix());
            std::process::exit(2);
        },
    }
}

fn run<W: Write>(files: &[String], ctx: &ParserContext, start: i64, stop: i64, out: &mut W) -> Result<bool, TgError> {
    if files.is_empty() {
        return stream_timegrep(io::stdin().lock(), ctx, start, stop, out, DEFAULT_CHUNK);
    }

    let mut any = false;
    for path in files {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            continue;
        }

        let mmap = unsafe { Mmap::map(&file)? };
        drop(file);

        if file_timegrep(&mmap, ctx, start, stop, out, DEFAULT_CHUNK)? {
            any = true;
        }
    }

    Ok(any)
}
