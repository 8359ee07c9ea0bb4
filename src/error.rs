//! Error taxonomy, named by kind rather than by call site.

use thiserror::Error;

/// Everything that can go wrong in the core, grouped the way a caller needs to react to it:
/// `BadFormat`/`BadTimezone`/`BadArg` are the user's fault, `RegexEngine`/`OutOfMemory`/`Io` are
/// the environment's.
#[derive(Debug, Error)]
pub enum TgError {
    #[error("bad format: {0}")]
    BadFormat(String),

    #[error("bad timezone: {0}")]
    BadTimezone(String),

    #[error("bad argument: {0}")]
    BadArg(String),

    #[error("regex engine error: {0}")]
    RegexEngine(String),

    #[error("out of memory")]
    OutOfMemory,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type TgResult<T> = Result<T, TgError>;
