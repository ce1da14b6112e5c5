//! Pipeline conversions module
//!
//! Orchestrates a single 3FR to EXR conversion and records its step timings.

mod raw_to_exr;
pub mod timing;

#[cfg(test)]
mod tests;

pub use raw_to_exr::RawToExrPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
