//! Image processing pipeline module
//!
//! Converts Hasselblad 3FR raw files into floating-point OpenEXR images,
//! with separate modules for RAW decoding, developing, pixel conversion,
//! EXR writing, per-file orchestration and directory batching.

pub mod common;
pub mod raw;
pub mod develop;
pub mod pixel;
pub mod exr;
pub mod conversions;
pub mod batch;

#[cfg(test)]
mod testing;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    GeometryOverride,
    ProcessingRegion,
    RawDecoder,
    RawFrame,
    RawLoaderDecoder,
    SensorGeometry,
};

pub use pixel::{
    ColorMode,
    ConversionOptions,
    FloatRaster,
};

pub use exr::{
    ConversionConfig,
    ConversionConfigBuilder,
    ExrCompression,
    ExrOutput,
    ExrPrecision,
    ExrWriter,
    StandardExrWriter,
};

pub use conversions::{
    PipelineTimings,
    RawToExrPipeline,
};

pub use batch::{
    BatchRunner,
    BatchSummary,
};
