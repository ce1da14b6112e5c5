use std::io::{Seek, Write};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::exr::types::ConversionConfig;
use crate::image_pipeline::pixel::FloatRaster;

/// Seekable byte sink an EXR file is encoded into (a file, or a cursor in tests).
pub trait ExrOutput: Write + Seek {}

impl<T: Write + Seek> ExrOutput for T {}

pub trait ExrWriter {
    fn write_exr(&self, raster: &FloatRaster, output: &mut dyn ExrOutput, config: &ConversionConfig) -> Result<()>;
}
