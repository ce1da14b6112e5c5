//! Batch driver module
//!
//! Finds the 3FR files of a directory, converts each one into
//! `<dir>/EXR/<name>.exr`, and tallies the outcomes.

pub mod discovery;
mod runner;


pub use discovery::{find_inputs, is_3fr_file, output_dir_for, output_path_for};
pub use runner::{BatchRunner, BatchSummary, FileOutcome};
