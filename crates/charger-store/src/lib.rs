//! On-disk layout and file primitives for the charger module host

mod io;
mod paths;

pub use io::{append_jsonl, atomic_write, read_jsonl, tail_jsonl};
pub use paths::{Paths, HOME_ENV};
