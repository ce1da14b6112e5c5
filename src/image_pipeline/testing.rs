//! Mock decoder and writer shared by the pipeline and batch tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::exr::{ConversionConfig, ExrOutput, ExrWriter};
use crate::image_pipeline::pixel::FloatRaster;
use crate::image_pipeline::raw::{
    ProcessingRegion, RawDecoder, RawFrame, SensorGeometry, SensorImage, SensorLayout,
};

/// Input bytes starting with this marker make [`MockDecoder::open`] fail.
pub const CORRUPT_MARKER: &[u8] = b"corrupt";

pub struct MockDecoder {
    pub geometry: SensorGeometry,
    /// Frame returned by `process`; a ramp of the region's size when `None`
    pub frame: Option<RawFrame>,
    pub fail_process: bool,
    pub regions: Arc<Mutex<Vec<ProcessingRegion>>>,
}

impl MockDecoder {
    pub fn new(geometry: SensorGeometry) -> Self {
        Self {
            geometry,
            frame: None,
            fail_process: false,
            regions: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new(SensorGeometry::from_crops(12, 10, [1, 2, 1, 2]))
    }
}

impl RawDecoder for MockDecoder {
    fn open(&self, data: &[u8]) -> Result<SensorImage> {
        if data.starts_with(CORRUPT_MARKER) {
            return Err(ConversionError::DecodeOpen("Mock decode error".to_string()));
        }
        Ok(SensorImage {
            geometry: self.geometry,
            layout: SensorLayout::Rgb,
            data: Vec::new(),
            black_levels: [0; 4],
            white_levels: [u16::MAX; 4],
            wb_coeffs: [1.0; 4],
            xyz_to_cam: [[0.0; 3]; 4],
        })
    }

    fn process(&self, _image: SensorImage, region: &ProcessingRegion) -> Result<RawFrame> {
        self.regions.lock().unwrap().push(*region);
        if self.fail_process {
            return Err(ConversionError::DecodeProcess("Mock process error".to_string()));
        }
        if let Some(frame) = &self.frame {
            return Ok(frame.clone());
        }
        let samples: Vec<u16> = (0..region.width * region.height * 3)
            .map(|i| (i * 97 % 65536) as u16)
            .collect();
        Ok(RawFrame::from_u16(region.width, region.height, 3, &samples))
    }
}

pub struct MockWriter {
    pub should_fail: bool,
    pub written: Arc<Mutex<Vec<FloatRaster>>>,
}

impl MockWriter {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ExrWriter for MockWriter {
    fn write_exr(
        &self,
        raster: &FloatRaster,
        output: &mut dyn ExrOutput,
        _config: &ConversionConfig,
    ) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::Write("Mock encode error".to_string()));
        }
        self.written.lock().unwrap().push(raster.clone());
        output
            .write_all(b"mock exr")
            .map_err(|e| ConversionError::Write(e.to_string()))
    }
}
