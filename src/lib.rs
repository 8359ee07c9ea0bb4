//! timegrep: extract a time window of lines from time-ordered log files by binary search.

pub mod cli;
pub mod context;
pub mod emit;
pub mod error;
pub mod extract;
pub mod format;
pub mod line;
pub mod msg;
pub mod scan;
pub mod search;
pub mod strptime;
pub mod token;
