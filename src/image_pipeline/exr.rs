//! EXR writing module
//!
//! This module provides OpenEXR output with selectable compression and
//! sample precision, plus the run-wide conversion configuration.

mod writer;
mod standard_exr_writer;
pub mod types;

pub use writer::{ExrOutput, ExrWriter};
pub use standard_exr_writer::StandardExrWriter;
pub use types::{ConversionConfig, ConversionConfigBuilder, ExrCompression, ExrPrecision};
