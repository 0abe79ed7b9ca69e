//! MultiHiertt-style dataset records.
//!
//! Records are kept as raw JSON objects so that rewriting a file preserves
//! every field and its key order. [`Example`] is the typed, read-only view the
//! exporters work from.

mod example;
mod io;

pub use example::{Example, UNKNOWN_UID};
pub use io::{load_examples, load_records, renumber_uids, save_records, write_pretty_json};
