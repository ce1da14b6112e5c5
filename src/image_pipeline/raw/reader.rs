use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::geometry::ProcessingRegion;
use crate::image_pipeline::raw::types::{RawFrame, SensorImage};

/// Two-phase RAW decoding: unpack the sensor first, then develop a region.
///
/// Splitting the phases lets the caller read the sensor geometry and pick a
/// processing region before any pixel work is done.
pub trait RawDecoder {
    fn open(&self, data: &[u8]) -> Result<SensorImage>;
    fn process(&self, image: SensorImage, region: &ProcessingRegion) -> Result<RawFrame>;
}
