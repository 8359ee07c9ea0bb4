//! File emitter: two binary searches bracket the output range, then the bytes between them are
//! written with paging advice to drop already-written pages.

use std::io::{self, Write};

use memmap2::Mmap;

use crate::context::ParserContext;
use crate::error::{TgError, TgResult};
use crate::search::{binary_search, SearchOutcome};

/// Run the binary-search / write pipeline over a memory-mapped file. Returns `Ok(true)` if any
/// bytes were emitted, `Ok(false)` if the window matched nothing in this file.
pub fn file_timegrep<W: Write>(mmap: &Mmap, ctx: &ParserContext, start: i64, stop: i64, out: &mut W,
                                chunk: usize)
                                -> TgResult<bool> {
    let data: &[u8] = mmap;
    let size = data.len();

    let lo = match binary_search(data, size, ctx, start, 0) {
        SearchOutcome::Found(pos) => pos,
        SearchOutcome::NotFound => return Ok(false),
        SearchOutcome::Error(e) => return Err(e),
    };

    let hi = match binary_search(data, size, ctx, stop, lo) {
        SearchOutcome::Found(pos) => pos,
        SearchOutcome::NotFound => size,
        SearchOutcome::Error(e) => return Err(e),
    };

    write_range(data, lo, hi, out, chunk, Some(mmap.as_ptr()))?;

    if hi == size {
        out.write_all(b"\n")?;
    }

    Ok(true)
}

/// Write `data[lo..hi)` to `out` in `chunk`-sized pieces, honoring partial writes and advising the
/// OS to drop pages that have already been fully written past.
fn write_range<W: Write>(data: &[u8], mut lo: usize, hi: usize, out: &mut W, chunk: usize,
                          mmap_base: Option<*const u8>)
                          -> TgResult<()> {
    let page_size = page_size();
    let page_mask = !(page_size - 1);
    let mut lbound_aligned = lo & page_mask;

    while lo < hi {
        let want = chunk.min(hi - lo);
        let mut written = 0;
        while written < want {
            let n = out.write(&data[lo + written..lo + want])?;
            if n == 0 {
                return Err(TgError::Io(io::Error::new(io::ErrorKind::WriteZero, "write returned 0 bytes")));
            }
            written += n;
        }
        lo += want;

        if let Some(base) = mmap_base {
            if lbound_aligned + chunk < lo {
                let ubound_aligned = lo & page_mask;
                if lbound_aligned < ubound_aligned {
                    unsafe {
                        libc::madvise(base.add(lbound_aligned) as *mut libc::c_void,
                                      ubound_aligned - lbound_aligned,
                                      libc::MADV_DONTNEED);
                    }
                }
                lbound_aligned = ubound_aligned;
            }
        }
    }

    Ok(())
}

fn page_size() -> usize {
    let n = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if n > 0 {
        n as usize
    } else {
        4096
    }
}
